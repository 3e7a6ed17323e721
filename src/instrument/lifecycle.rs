use super::edits::{EditBatch, TextEdit};
use crate::error::{GadgetError, Result};
use crate::parser::{leading_whitespace, line_has_id, line_matches_any_variant, SourceText, Span, TraceId};
use tracing::debug;

pub const LINE_COMMENT: &str = "//";

/// New content for one zero-based line; `None` deletes the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    pub line: usize,
    pub replacement: Option<String>,
}

/// Zero-based indices of every line carrying `id` in any variant.
pub fn lines_with_id(lines: &[&str], id: &TraceId) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line_has_id(line, id))
        .map(|(i, _)| i)
        .collect()
}

/// Id carried by the cursor line, or [`GadgetError::NoTagOnLine`].
pub fn id_on_line(lines: &[&str], line: usize) -> Result<TraceId> {
    lines
        .get(line)
        .and_then(|l| line_matches_any_variant(l))
        .ok_or(GadgetError::NoTagOnLine)
}

/// Flip one line between active and commented out.
///
/// Uncommenting strips one `//` and one following space but keeps the
/// indentation in front of it.
pub fn toggle_line(line: &str) -> String {
    let indent = leading_whitespace(line);
    let rest = &line[indent.len()..];
    match rest.strip_prefix(LINE_COMMENT) {
        Some(uncommented) => {
            let uncommented = uncommented.strip_prefix(' ').unwrap_or(uncommented);
            format!("{}{}", indent, uncommented)
        }
        None => format!("{} {}", LINE_COMMENT, line),
    }
}

/// Toggle every line of the trace independently.
pub fn toggle(lines: &[&str], id: &TraceId) -> Vec<LineEdit> {
    lines_with_id(lines, id)
        .into_iter()
        .map(|i| LineEdit {
            line: i,
            replacement: Some(toggle_line(lines[i])),
        })
        .collect()
}

/// Delete every line of the trace.
pub fn remove(lines: &[&str], id: &TraceId) -> Vec<LineEdit> {
    lines_with_id(lines, id)
        .into_iter()
        .map(|i| LineEdit {
            line: i,
            replacement: None,
        })
        .collect()
}

/// Turn line edits into byte edits against the snapshot.
///
/// Runs of adjacent deletions become one edit. A run reaching an
/// unterminated last line takes the terminator before it instead, so
/// removal never leaves a trailing newline the text did not have.
pub fn line_edits_to_batch(source: &SourceText<'_>, edits: &[LineEdit]) -> EditBatch {
    let mut batch = EditBatch::new();
    let mut deleted: Vec<usize> = Vec::new();

    for edit in edits {
        match &edit.replacement {
            Some(text) => batch.push(TextEdit::replace(source.line_span(edit.line), text.clone())),
            None => deleted.push(edit.line),
        }
    }

    deleted.sort_unstable();
    deleted.dedup();

    let last = source.line_count() - 1;
    let mut i = 0;
    while i < deleted.len() {
        let first = deleted[i];
        let mut end_line = first;
        while i + 1 < deleted.len() && deleted[i + 1] == end_line + 1 {
            i += 1;
            end_line += 1;
        }
        i += 1;

        let mut start = source.line_start(first);
        let end = source.full_line_span(end_line).end;
        if end_line == last && first > 0 {
            start = source.line_span(first - 1).end;
        }
        batch.push(TextEdit::delete(Span::new(start, end)));
    }

    batch
}

/// Toggle the trace whose tag sits on `cursor_line`.
pub fn toggle_text(source: &SourceText<'_>, cursor_line: usize) -> Result<(TraceId, EditBatch)> {
    let lines = source.lines();
    let id = id_on_line(&lines, cursor_line)?;
    let edits = toggle(&lines, &id);
    debug!(%id, lines = edits.len(), "toggling trace");
    Ok((id, line_edits_to_batch(source, &edits)))
}

/// Remove the trace whose tag sits on `cursor_line`.
pub fn remove_text(source: &SourceText<'_>, cursor_line: usize) -> Result<(TraceId, EditBatch)> {
    let lines = source.lines();
    let id = id_on_line(&lines, cursor_line)?;
    let edits = remove(&lines, &id);
    debug!(%id, lines = edits.len(), "removing trace");
    Ok((id, line_edits_to_batch(source, &edits)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_line_pairs() {
        assert_eq!(toggle_line("    x := 1"), "//     x := 1");
        assert_eq!(toggle_line("//     x := 1"), "    x := 1");
        assert_eq!(toggle_line("    // x := 1"), "    x := 1");
        assert_eq!(toggle_line("    //x := 1"), "    x := 1");
    }

    #[test]
    fn deletion_at_unterminated_end_takes_previous_terminator() {
        let source = SourceText::new("a\nb\nc");
        let edits = vec![
            LineEdit { line: 1, replacement: None },
            LineEdit { line: 2, replacement: None },
        ];
        let batch = line_edits_to_batch(&source, &edits);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.apply(source.as_str()).unwrap(), "a");
    }

    #[test]
    fn deleting_every_line_empties_the_text() {
        let source = SourceText::new("a\nb");
        let edits = vec![
            LineEdit { line: 0, replacement: None },
            LineEdit { line: 1, replacement: None },
        ];
        let batch = line_edits_to_batch(&source, &edits);
        assert_eq!(batch.apply(source.as_str()).unwrap(), "");
    }
}
