// Client side of the interview flow: explicit form state plus an HTTP client
// that consumes the streamed response. Used by the `practice` binary.

pub mod form;
pub mod http;

pub use form::{FormAction, FormState};
pub use http::{ClientError, InterviewClient};
