use super::types::BlockSpan;
use regex::Regex;
use tracing::debug;

pub const DEFAULT_KEYWORD: &str = "assembly";

/// Finds keyword blocks (`assembly { ... }`, `assembly ("memory-safe") { ... }`)
/// by matching headers and counting braces over raw text.
///
/// Braces inside string literals or comments are counted like any other
/// brace; this is a textual heuristic, not a parser.
#[derive(Debug, Clone)]
pub struct BlockLocator {
    header: Regex,
}

impl Default for BlockLocator {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD)
    }
}

impl BlockLocator {
    pub fn new(keyword: &str) -> Self {
        let pattern = format!(r"{}(\s*\([^)]*\))?\s*\{{", regex::escape(keyword));
        Self {
            header: Regex::new(&pattern).expect("escaped keyword forms a valid regex"),
        }
    }

    /// Nearest block whose header starts strictly before `offset`.
    ///
    /// Only the header position is compared; a cursor sitting after a block
    /// has already closed is still attributed to that block.
    pub fn locate_enclosing_block(&self, text: &str, offset: usize) -> Option<BlockSpan> {
        let header = self
            .header
            .find_iter(text)
            .take_while(|m| m.start() < offset)
            .last()?;

        // The match always ends with the opening brace.
        let open = header.end() - 1;
        let close = find_matching_brace(text, open)?;

        debug!(
            start = header.start(),
            open,
            close,
            "resolved enclosing block"
        );
        Some(BlockSpan {
            start: header.start(),
            open,
            close,
        })
    }
}

/// Offset of the `}` that balances the first `{` at or after `from`.
pub fn find_matching_brace(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let open = from + bytes.get(from..)?.iter().position(|&b| b == b'{')?;

    let mut depth: u32 = 0;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Locate with the default `assembly` keyword.
pub fn locate_enclosing_block(text: &str, offset: usize) -> Option<BlockSpan> {
    BlockLocator::default().locate_enclosing_block(text, offset)
}
