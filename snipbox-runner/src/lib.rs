//! Execution proxy for the Snipbox snippet service.
//!
//! Packages a snippet as a single-file submission, forwards it to an external
//! code runner with the service's own credentials, and normalises the reply
//! into an [`ExecutionOutcome`].

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod language;
pub mod outcome;
pub mod proxy;
pub mod submission;

pub use backend::RunnerBackend;
pub use config::RunnerConfig;
pub use error::RunnerError;
pub use http::HttpRunner;
pub use language::{Language, UnknownLanguage};
pub use outcome::{ExecutionOutcome, FailureKind};
pub use proxy::ExecutionProxy;
pub use submission::{parse_run_output, RunOutput, SourceFile, Submission};
