use thiserror::Error;

pub type Result<T> = std::result::Result<T, GadgetError>;

/// How an aborted operation should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
        }
    }
}

/// Every failure leaves the document untouched.
#[derive(Error, Debug)]
pub enum GadgetError {
    #[error("No variable selected.")]
    NoSelection,

    #[error("No enclosing assembly block found.")]
    NoEnclosingBlock,

    #[error("No display format chosen.")]
    NoFormatChosen,

    #[error("No gadget debug tag found on current line.")]
    NoTagOnLine,

    #[error("Could not apply edits: {0}")]
    Apply(String),

    #[error("Document changed on disk since it was read: {0}")]
    Stale(String),

    #[error("Position out of range: line {0}, character {1}")]
    InvalidPosition(usize, usize),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unreadable frame: {0}")]
    Framing(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GadgetError {
    /// Cancellation and "nothing to do" are informational, not failures.
    pub fn severity(&self) -> Severity {
        match self {
            GadgetError::NoFormatChosen | GadgetError::NoTagOnLine => Severity::Info,
            _ => Severity::Error,
        }
    }
}
