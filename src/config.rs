use crate::parser::{DEFAULT_ID_LENGTH, DEFAULT_KEYWORD};
use std::path::PathBuf;

pub const LOG_ENV: &str = "GADGETS_DEBUG_LOG";

/// Runtime settings shared by the CLI and the protocol server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Keyword that introduces an instrumentable block.
    pub keyword: String,
    /// Length of generated trace ids.
    pub id_length: usize,
    /// Append-mode log file in addition to stderr.
    pub log_file: Option<PathBuf>,
    /// `EnvFilter` directive used when `GADGETS_DEBUG_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            id_length: DEFAULT_ID_LENGTH,
            log_file: None,
            log_filter: "info".to_string(),
        }
    }
}
