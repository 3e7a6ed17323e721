use crate::error::{GadgetError, Result};
use crate::parser::Span;

/// Identifier characters, dots included so `x.offset` is one word.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

/// Span of the word touching byte `offset`, if any.
pub fn word_at(text: &str, offset: usize) -> Option<Span> {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return None;
    }
    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(offset);
    let end = text[offset..]
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map(|(i, _)| offset + i)
        .unwrap_or(text.len());
    (start < end).then(|| Span::new(start, end))
}

/// The selected expression with each whitespace run collapsed to one space,
/// so a selection spanning lines yields single-line statements. Falls back to
/// the word under the cursor when the selection is empty or whitespace.
pub fn selected_expression(text: &str, selection: Span) -> Result<String> {
    let selected = text
        .get(selection.start..selection.end)
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if !selected.is_empty() {
        return Ok(selected);
    }

    word_at(text, selection.start)
        .map(|w| text[w.start..w.end].trim().to_string())
        .filter(|w| !w.is_empty())
        .ok_or(GadgetError::NoSelection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_selection_is_trimmed() {
        let text = "let v := mload(0x40)";
        assert_eq!(selected_expression(text, Span::new(8, 20)).unwrap(), "mload(0x40)");
    }

    #[test]
    fn multi_line_selection_is_collapsed() {
        let text = "let x := add(a,\r\n        1)";
        let start = text.find("add").unwrap();
        assert_eq!(
            selected_expression(text, Span::new(start, text.len())).unwrap(),
            "add(a, 1)"
        );
    }

    #[test]
    fn empty_selection_uses_word_under_cursor() {
        let text = "    x.offset := 1";
        assert_eq!(selected_expression(text, Span::point(7)).unwrap(), "x.offset");
        assert_eq!(selected_expression(text, Span::point(12)).unwrap(), "x.offset");
    }

    #[test]
    fn nothing_under_cursor() {
        assert!(matches!(
            selected_expression("a :=  b", Span::point(5)),
            Err(GadgetError::NoSelection)
        ));
    }
}
