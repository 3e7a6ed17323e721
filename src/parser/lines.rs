use super::types::{Position, Span};
use crate::error::{GadgetError, Result};

/// Line-indexed view over one immutable document snapshot.
///
/// Lines follow the editor model: a text ending in `\n` has a final empty
/// line, and an empty text has exactly one empty line.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line]
    }

    /// Span of the line's content, without its terminator.
    pub fn line_span(&self, line: usize) -> Span {
        let start = self.line_starts[line];
        let mut end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Span::new(start, end)
    }

    /// Span of the line including its `\n` or `\r\n`, if any.
    pub fn full_line_span(&self, line: usize) -> Span {
        let start = self.line_starts[line];
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        Span::new(start, end)
    }

    pub fn line(&self, line: usize) -> &'a str {
        let span = self.line_span(line);
        &self.text[span.start..span.end]
    }

    pub fn lines(&self) -> Vec<&'a str> {
        (0..self.line_count()).map(|i| self.line(i)).collect()
    }

    /// True when the line ends with a terminator, i.e. another line follows it.
    pub fn has_terminator(&self, line: usize) -> bool {
        line + 1 < self.line_starts.len()
    }

    /// Line containing the byte `offset`. Offsets past the end map to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// Terminator used by generated lines: CRLF if the document already uses it.
    pub fn eol(&self) -> &'static str {
        if self.text.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    pub fn indent_of(&self, line: usize) -> &'a str {
        leading_whitespace(self.line(line))
    }

    /// Byte offset of a zero-based line/character position.
    pub fn offset_at(&self, pos: Position) -> Result<usize> {
        if pos.line >= self.line_count() {
            return Err(GadgetError::InvalidPosition(pos.line, pos.character));
        }
        let span = self.line_span(pos.line);
        let content = &self.text[span.start..span.end];
        let mut chars = content.char_indices().map(|(i, _)| i).chain(std::iter::once(content.len()));
        chars
            .nth(pos.character)
            .map(|i| span.start + i)
            .ok_or(GadgetError::InvalidPosition(pos.line, pos.character))
    }

    /// Zero-based line/character position of a byte offset.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_of(offset);
        let start = self.line_starts[line];
        let character = self.text[start..offset].chars().count();
        Position::new(line, character)
    }

    /// Byte offset of a character offset counted from the start of the text.
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()))
            .nth(char_offset)
    }

    pub fn char_offset(&self, byte_offset: usize) -> usize {
        self.text[..byte_offset.min(self.text.len())].chars().count()
    }
}

/// Leading spaces and tabs of a line.
pub fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_line_model() {
        let src = SourceText::new("a\r\nbb\n");
        assert_eq!(src.line_count(), 3);
        assert_eq!(src.line(0), "a");
        assert_eq!(src.line(1), "bb");
        assert_eq!(src.line(2), "");
        assert!(src.has_terminator(1));
        assert!(!src.has_terminator(2));
        assert_eq!(src.full_line_span(0), Span::new(0, 3));
        assert_eq!(src.eol(), "\r\n");
    }

    #[test]
    fn positions_count_characters() {
        let src = SourceText::new("é x\ny");
        assert_eq!(src.offset_at(Position::new(0, 2)).unwrap(), 3);
        assert_eq!(src.position_at(3), Position::new(0, 2));
        assert_eq!(src.offset_at(Position::new(1, 1)).unwrap(), 6);
        assert!(src.offset_at(Position::new(1, 2)).is_err());
        assert_eq!(src.byte_offset(1), Some(2));
        assert_eq!(src.char_offset(2), 1);
    }

    #[test]
    fn indentation() {
        assert_eq!(leading_whitespace("\t  let x"), "\t  ");
        assert!(is_blank("   \t"));
        assert!(!is_blank("  }"));
    }
}
