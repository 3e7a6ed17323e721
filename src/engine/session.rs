use super::picker::FormatPicker;
use crate::config::Config;
use crate::error::{GadgetError, Result};
use crate::instrument::{
    plan_instrumentation, remove_text, selected_expression, toggle_text, EditBatch,
};
use crate::parser::{
    is_tag_line, make_trace_id_with_len, scan_trace_ids, BlockLocator, DisplayFormat, SourceText,
    Span, TraceId, TraceLocation,
};
use tracing::{debug, warn};

/// Result of a successful operation: the trace it touched and the edits to
/// apply as one transaction.
#[derive(Debug, Clone)]
pub struct TraceOutcome {
    pub id: TraceId,
    pub batch: EditBatch,
}

/// Runs create / toggle / remove against one text snapshot at a time.
///
/// Nothing here mutates a document; callers hand the returned batch to
/// whatever applies edits atomically.
#[derive(Debug, Clone)]
pub struct Engine {
    locator: BlockLocator,
    id_length: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Engine {
    pub fn new(config: &Config) -> Self {
        Self {
            locator: BlockLocator::new(&config.keyword),
            id_length: config.id_length,
        }
    }

    /// Instrument the expression selected by the byte span `selection`.
    ///
    /// The format is asked for only after the block is known, so a cursor
    /// outside any block never prompts.
    pub fn add_trace(
        &self,
        text: &str,
        selection: Span,
        picker: &mut dyn FormatPicker,
    ) -> Result<TraceOutcome> {
        let result = self.plan_add(text, selection, picker);
        if let Err(e) = &result {
            warn!(error = %e, "trace creation aborted");
        }
        result
    }

    fn plan_add(
        &self,
        text: &str,
        selection: Span,
        picker: &mut dyn FormatPicker,
    ) -> Result<TraceOutcome> {
        let source = SourceText::new(text);
        let expression = selected_expression(text, selection)?;

        let block = self
            .locator
            .locate_enclosing_block(text, selection.start)
            .ok_or(GadgetError::NoEnclosingBlock)?;

        let format = picker
            .pick(&DisplayFormat::ALL)
            .ok_or(GadgetError::NoFormatChosen)?;

        let id = make_trace_id_with_len(self.id_length);
        debug!(%id, expression = %expression, %format, "creating trace");

        let plan = plan_instrumentation(
            &source,
            block,
            source.line_of(selection.start),
            &expression,
            format,
            id,
        );
        let id = plan.id.clone();
        let batch = plan.into_batch();
        batch.validate(text)?;
        Ok(TraceOutcome { id, batch })
    }

    /// Flip the comment state of every line of the trace on `line`.
    pub fn toggle_trace(&self, text: &str, line: usize) -> Result<TraceOutcome> {
        let source = SourceText::new(text);
        let (id, batch) = toggle_text(&source, line)?;
        Ok(TraceOutcome { id, batch })
    }

    /// Delete every line of the trace on `line`.
    pub fn remove_trace(&self, text: &str, line: usize) -> Result<TraceOutcome> {
        let source = SourceText::new(text);
        let (id, batch) = remove_text(&source, line)?;
        Ok(TraceOutcome { id, batch })
    }

    pub fn is_tag_line(&self, text: &str, line: usize) -> bool {
        let source = SourceText::new(text);
        line < source.line_count() && is_tag_line(source.line(line))
    }

    pub fn list_traces(&self, text: &str) -> Vec<TraceLocation> {
        scan_trace_ids(&SourceText::new(text).lines())
    }
}
