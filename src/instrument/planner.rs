use super::edits::{EditBatch, TextEdit};
use crate::parser::{
    is_blank, render_tag, BlockSpan, DisplayFormat, SourceText, TagVariant, TraceId,
};
use tracing::debug;

/// Prefix that marks generated variables as synthetic.
pub const DEBUG_VAR_PREFIX: &str = "Debug";

/// The three insertions of one trace, all against the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentationPlan {
    pub id: TraceId,
    pub variable: String,
    pub declaration: TextEdit,
    pub assignment: TextEdit,
    pub log: TextEdit,
}

impl InstrumentationPlan {
    /// Declaration, assignment, log, in that order.
    pub fn into_batch(self) -> EditBatch {
        [self.declaration, self.assignment, self.log].into_iter().collect()
    }
}

/// `Debug` followed by the expression with member-access dots and
/// whitespace removed.
pub fn debug_variable_name(expression: &str) -> String {
    let stem: String = expression
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();
    format!("{}{}", DEBUG_VAR_PREFIX, stem)
}

/// Insertion that puts `lines` on their own line(s) directly after `line`.
///
/// When `line` is the unterminated last line, the terminator goes in front
/// so the text does not gain a trailing newline.
fn insert_after_line(source: &SourceText<'_>, line: usize, lines: &[String]) -> TextEdit {
    let eol = source.eol();
    if source.has_terminator(line) {
        let mut text = String::new();
        for l in lines {
            text.push_str(l);
            text.push_str(eol);
        }
        TextEdit::insert(source.line_start(line + 1), text)
    } else {
        let mut text = String::new();
        for l in lines {
            text.push_str(eol);
            text.push_str(l);
        }
        TextEdit::insert(source.len(), text)
    }
}

/// Insertion at the start of `line`, pushing it down.
fn insert_before_line(source: &SourceText<'_>, line: usize, content: &str) -> TextEdit {
    TextEdit::insert(
        source.line_start(line),
        format!("{}{}", content, source.eol()),
    )
}

fn log_lines(indent: &str, variable: &str, format: DisplayFormat, tag: &str) -> Vec<String> {
    match format {
        DisplayFormat::Uint => vec![format!(
            "{indent}console.log(\"{variable} %d\", {variable}); // {tag}"
        )],
        DisplayFormat::Hex => vec![format!(
            "{indent}console.log(\"{variable} %x\", {variable}); // {tag}"
        )],
        DisplayFormat::Bytes => vec![
            format!("{indent}console.log(\"{variable}:\"); // {tag}"),
            format!("{indent}console.logBytes({variable}); // {tag}"),
        ],
    }
}

/// Compute the declaration, assignment and log insertions for one trace.
///
/// `selection_line` is the zero-based line holding the selection start.
pub fn plan_instrumentation(
    source: &SourceText<'_>,
    block: BlockSpan,
    selection_line: usize,
    expression: &str,
    format: DisplayFormat,
    id: TraceId,
) -> InstrumentationPlan {
    let variable = debug_variable_name(expression);

    let header_line = source.line_of(block.start);
    let declaration_text = |indent: &str| {
        format!(
            "{}uint {}; // {}",
            indent,
            variable,
            render_tag(TagVariant::Declaration, &id)
        )
    };
    let declaration = if header_line > 0 {
        let above = source.line(header_line - 1);
        let indent = if is_blank(above) {
            source.indent_of(header_line)
        } else {
            source.indent_of(header_line - 1)
        };
        insert_before_line(source, header_line - 1, &declaration_text(indent))
    } else {
        insert_before_line(source, 0, &declaration_text(source.indent_of(0)))
    };

    let assignment = insert_after_line(
        source,
        selection_line,
        &[format!(
            "{}{} := {}; // {}",
            source.indent_of(selection_line),
            variable,
            expression,
            render_tag(TagVariant::Assignment, &id)
        )],
    );

    let close_line = source.line_of(block.close);
    let log = insert_after_line(
        source,
        close_line,
        &log_lines(
            source.indent_of(close_line),
            &variable,
            format,
            &render_tag(TagVariant::Log, &id),
        ),
    );

    debug!(
        %id,
        header_line,
        selection_line,
        close_line,
        %format,
        "planned instrumentation"
    );

    InstrumentationPlan {
        id,
        variable,
        declaration,
        assignment,
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_name_drops_dots() {
        assert_eq!(debug_variable_name("x"), "Debugx");
        assert_eq!(debug_variable_name("p.slot"), "Debugpslot");
        assert_eq!(debug_variable_name("add(a, 1)"), "Debugadd(a,1)");
    }
}
