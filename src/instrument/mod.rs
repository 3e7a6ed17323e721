mod edits;
mod lifecycle;
mod planner;
mod selection;

pub use edits::{EditBatch, Range, TextEdit, WireEdit};
pub use lifecycle::{
    id_on_line, line_edits_to_batch, lines_with_id, remove, remove_text, toggle, toggle_line,
    toggle_text, LineEdit, LINE_COMMENT,
};
pub use planner::{debug_variable_name, plan_instrumentation, InstrumentationPlan, DEBUG_VAR_PREFIX};
pub use selection::{selected_expression, word_at};
