use crate::types::Field;

/// Misuse of the interview state machine. Answer text itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterviewError {
    #[error("interview not started")]
    NotStarted,
    #[error("interview already complete")]
    Finished,
    #[error("nothing to refine: interview still waiting on {0}")]
    Incomplete(Field),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid session id: {0:?}")]
    InvalidSession(String),
    #[error("invalid persona id: {0:?}")]
    InvalidId(String),
    #[error("persona not found: {0}")]
    NotFound(String),
    #[error("store I/O failure: {0}")]
    Io(String),
    #[error("corrupt persona record {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Structured result of `sat check --json`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckReport {
    pub file: String,
    pub pass: bool,
    pub errors: Vec<CheckIssue>,
    pub warnings: Vec<CheckIssue>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckIssue {
    pub code: String,
    pub check: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
