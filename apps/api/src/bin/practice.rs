use std::io::Write;

use anyhow::{bail, Context};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interview_api::client::{FormAction, FormState, InterviewClient};
use interview_api::interview::technique::Technique;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "practice",
    about = "Generate interview practice questions from a running Interview API"
)]
struct Args {
    /// Base URL of the Interview API
    #[structopt(short, long, default_value = "http://localhost:8080")]
    server: String,

    /// Interview topic, e.g. "React" or "System Design"
    #[structopt(short, long)]
    topic: String,

    /// Prompt technique (few-shot, chain-of-thought, zero-shot, role-playing, step-by-step)
    #[structopt(short = "p", long, default_value = "few-shot")]
    technique: Technique,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so stdout carries only the generated text.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::from_args();
    let client = InterviewClient::new(&args.server)?;

    let mut state = FormState::default();
    state.apply(FormAction::SetTopic(args.topic));
    state.apply(FormAction::SetTechnique(args.technique));
    state.apply(FormAction::SetCredentialFlag(client.check_api_key().await));

    if !state.api_key_set {
        bail!("The OpenAI API key is not set. Please set the OPENAI_API_KEY environment variable.");
    }

    info!(
        technique = %state.technique,
        "{}: {}",
        state.technique.label(),
        state.technique_description
    );

    let mut stdout = std::io::stdout();
    client
        .submit(&mut state, |chunk| {
            let _ = stdout.write_all(chunk.as_bytes());
            let _ = stdout.flush();
        })
        .await
        .context("Interview request failed")?;
    writeln!(stdout)?;

    Ok(())
}
