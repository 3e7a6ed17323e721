mod block;
mod lines;
mod tags;
mod types;

pub use block::{find_matching_brace, locate_enclosing_block, BlockLocator, DEFAULT_KEYWORD};
pub use lines::{is_blank, leading_whitespace, SourceText};
pub use tags::{
    is_tag_line, line_has_id, line_matches_any_variant, make_trace_id, make_trace_id_with_len,
    render_tag, scan_trace_ids, tag_pattern, TagVariant, TraceId, TraceLocation,
    DEFAULT_ID_LENGTH, TAG_PREFIX,
};
pub use types::{BlockSpan, DisplayFormat, Position, Span};
