use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("precondition failed: {0}")]
    Precondition(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("code host error: {0}")]
    CodeHost(String),
    #[error("coding agent error: {0}")]
    CodingAgent(String),
    #[error("failed to parse external response: {0}")]
    ResponseParse(String),
    #[error("interrupted")]
    Interrupted,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
