mod document;
mod picker;
mod session;

pub use document::Document;
pub use picker::{FormatPicker, Preselected, PromptPicker};
pub use session::{Engine, TraceOutcome};
