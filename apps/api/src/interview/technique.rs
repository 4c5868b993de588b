//! Prompt techniques: the five prompting strategies a user can pick, each
//! mapped to a fixed system prompt by an exhaustive match.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interview::prompts::{
    CHAIN_OF_THOUGHT_SYSTEM, FEW_SHOT_SYSTEM, ROLE_PLAYING_SYSTEM, STEP_BY_STEP_SYSTEM,
    ZERO_SHOT_SYSTEM,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    #[default]
    FewShot,
    ChainOfThought,
    ZeroShot,
    RolePlaying,
    StepByStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown prompt technique '{0}'")]
pub struct UnknownTechnique(pub String);

impl Technique {
    /// Every technique, in the order the selector lists them.
    pub const ALL: [Technique; 5] = [
        Technique::FewShot,
        Technique::ChainOfThought,
        Technique::ZeroShot,
        Technique::RolePlaying,
        Technique::StepByStep,
    ];

    /// Wire identifier, e.g. `chain-of-thought`.
    pub fn as_str(self) -> &'static str {
        match self {
            Technique::FewShot => "few-shot",
            Technique::ChainOfThought => "chain-of-thought",
            Technique::ZeroShot => "zero-shot",
            Technique::RolePlaying => "role-playing",
            Technique::StepByStep => "step-by-step",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Technique::FewShot => FEW_SHOT_SYSTEM,
            Technique::ChainOfThought => CHAIN_OF_THOUGHT_SYSTEM,
            Technique::ZeroShot => ZERO_SHOT_SYSTEM,
            Technique::RolePlaying => ROLE_PLAYING_SYSTEM,
            Technique::StepByStep => STEP_BY_STEP_SYSTEM,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Technique::FewShot => "Few-Shot Learning",
            Technique::ChainOfThought => "Chain-of-Thought",
            Technique::ZeroShot => "Zero-Shot Prompting",
            Technique::RolePlaying => "Role-Playing",
            Technique::StepByStep => "Step-by-Step Guidance",
        }
    }

    /// One-sentence explanation shown next to the technique selector.
    pub fn description(self) -> &'static str {
        match self {
            Technique::FewShot => {
                "Provides example questions to guide the AI in generating similar questions for your topic."
            }
            Technique::ChainOfThought => {
                "Generates a series of questions that build upon each other, following a logical thought process."
            }
            Technique::ZeroShot => {
                "Creates diverse questions without any specific examples, covering various aspects of the topic."
            }
            Technique::RolePlaying => {
                "Simulates a real interview experience with an AI interviewer asking questions on your chosen topic."
            }
            Technique::StepByStep => {
                "Offers a comprehensive guide for interview preparation, including key concepts, resources, and practice questions."
            }
        }
    }
}

impl FromStr for Technique {
    type Err = UnknownTechnique;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Technique::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTechnique(s.to_string()))
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
