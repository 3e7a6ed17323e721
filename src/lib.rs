//! Injects, toggles and removes tagged debug traces inside `assembly { ... }`
//! blocks of a larger source file.
//!
//! A trace is three correlated statements sharing one id: a declaration above
//! the block, an assignment after the selected expression and a log call after
//! the closing brace. The markers on those lines are the only state; toggle
//! and remove rediscover a trace by scanning for its id.

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod instrument;
pub mod logging;
pub mod parser;

pub use config::Config;
pub use engine::{Document, Engine, FormatPicker, Preselected, PromptPicker, TraceOutcome};
pub use error::{GadgetError, Result, Severity};
