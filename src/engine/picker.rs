use crate::parser::DisplayFormat;
use std::io::{BufRead, Write};

/// The single suspension point of trace creation: asking the user for a
/// display format. `None` means the user cancelled.
pub trait FormatPicker {
    fn pick(&mut self, choices: &[DisplayFormat]) -> Option<DisplayFormat>;
}

/// Picker with a predetermined answer, used when the host already asked.
#[derive(Debug, Clone, Copy)]
pub struct Preselected(pub Option<DisplayFormat>);

impl FormatPicker for Preselected {
    fn pick(&mut self, choices: &[DisplayFormat]) -> Option<DisplayFormat> {
        self.0.filter(|f| choices.contains(f))
    }
}

/// Numbered quick-pick on a terminal. An empty answer or EOF cancels.
pub struct PromptPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> FormatPicker for PromptPicker<R, W> {
    fn pick(&mut self, choices: &[DisplayFormat]) -> Option<DisplayFormat> {
        loop {
            writeln!(self.output, "Select the format for logging this variable:").ok()?;
            for (i, choice) in choices.iter().enumerate() {
                writeln!(self.output, "  {}) {}", i + 1, choice).ok()?;
            }
            write!(self.output, "> ").ok()?;
            self.output.flush().ok()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer).ok()? == 0 {
                return None;
            }
            let answer = answer.trim();
            if answer.is_empty() {
                return None;
            }

            let picked = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| choices.get(i).copied())
                .or_else(|| answer.parse::<DisplayFormat>().ok().filter(|f| choices.contains(f)));
            if picked.is_some() {
                return picked;
            }
            writeln!(self.output, "Unknown choice: {}", answer).ok()?;
        }
    }
}
