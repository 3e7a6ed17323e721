use crate::error::{GadgetError, Result};
use crate::parser::{Position, SourceText, Span};
use serde::Serialize;

/// Replace `span` with `new_text`. An empty span is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            span: Span::point(offset),
            new_text: text.into(),
        }
    }

    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: text.into(),
        }
    }

    pub fn delete(span: Span) -> Self {
        Self {
            span,
            new_text: String::new(),
        }
    }
}

/// Editor-facing range in line/character coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// An edit translated for the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEdit {
    pub range: Range,
    pub new_text: String,
}

/// Edits against one snapshot that are applied together or not at all.
///
/// Offsets always refer to the original snapshot. Insertions at the same
/// offset land in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    edits: Vec<TextEdit>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edits sorted by position, keeping batch order for ties.
    fn ordered(&self) -> Vec<&TextEdit> {
        let mut ordered: Vec<&TextEdit> = self.edits.iter().collect();
        ordered.sort_by_key(|e| (e.span.start, e.span.end));
        ordered
    }

    /// Check every edit against the snapshot before anything is touched.
    pub fn validate(&self, text: &str) -> Result<()> {
        let mut last_end = 0usize;
        for edit in self.ordered() {
            let Span { start, end } = edit.span;
            if start > end || end > text.len() {
                return Err(GadgetError::Apply(format!(
                    "edit {}..{} outside document of {} bytes",
                    start,
                    end,
                    text.len()
                )));
            }
            if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
                return Err(GadgetError::Apply(format!(
                    "edit {}..{} splits a character",
                    start, end
                )));
            }
            if start < last_end {
                return Err(GadgetError::Apply(format!(
                    "edit {}..{} overlaps a previous edit ending at {}",
                    start, end, last_end
                )));
            }
            last_end = end;
        }
        Ok(())
    }

    /// New document text with every edit applied, or an error and no result.
    pub fn apply(&self, text: &str) -> Result<String> {
        self.validate(text)?;

        let mut out = String::with_capacity(text.len() + self.inserted_len());
        let mut cursor = 0usize;
        for edit in self.ordered() {
            out.push_str(&text[cursor..edit.span.start]);
            out.push_str(&edit.new_text);
            cursor = edit.span.end;
        }
        out.push_str(&text[cursor..]);
        Ok(out)
    }

    fn inserted_len(&self) -> usize {
        self.edits.iter().map(|e| e.new_text.len()).sum()
    }

    /// Translate into line/character ranges for an editor host.
    pub fn to_wire(&self, source: &SourceText<'_>) -> Vec<WireEdit> {
        self.edits
            .iter()
            .map(|edit| WireEdit {
                range: Range {
                    start: source.position_at(edit.span.start),
                    end: source.position_at(edit.span.end),
                },
                new_text: edit.new_text.clone(),
            })
            .collect()
    }
}

impl FromIterator<TextEdit> for EditBatch {
    fn from_iter<I: IntoIterator<Item = TextEdit>>(iter: I) -> Self {
        Self {
            edits: iter.into_iter().collect(),
        }
    }
}
