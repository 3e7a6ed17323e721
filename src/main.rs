use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gadgets_debug::error::Severity;
use gadgets_debug::instrument::EditBatch;
use gadgets_debug::parser::{DisplayFormat, Position, SourceText, Span, DEFAULT_ID_LENGTH, DEFAULT_KEYWORD};
use gadgets_debug::{
    adapter, logging, Config, Document, Engine, FormatPicker, GadgetError, Preselected,
    PromptPicker, TraceOutcome,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Tagged debug traces for assembly blocks.
#[derive(Parser, Debug)]
#[command(name = "gadgets-debug", version, about)]
struct Cli {
    /// Keyword that introduces an instrumentable block
    #[arg(long, global = true, env = "GADGETS_DEBUG_KEYWORD", default_value = DEFAULT_KEYWORD)]
    keyword: String,

    /// Length of generated trace ids
    #[arg(long, global = true, default_value_t = DEFAULT_ID_LENGTH)]
    id_length: usize,

    /// Also append logs to this file
    #[arg(long, global = true, env = "GADGETS_DEBUG_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log filter used when GADGETS_DEBUG_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the editor protocol on stdin/stdout
    Serve,

    /// Add a trace for the expression at a position (1-based)
    Add {
        file: PathBuf,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        column: usize,
        /// End of the selection; defaults to the start (word under cursor)
        #[arg(long, requires = "end_column")]
        end_line: Option<usize>,
        #[arg(long, requires = "end_line")]
        end_column: Option<usize>,
        /// Skip the prompt: uint, hex or bytes
        #[arg(long)]
        format: Option<DisplayFormat>,
        /// Print the result instead of writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Comment or uncomment the trace tagged on a line
    Toggle {
        file: PathBuf,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete the trace tagged on a line
    Remove {
        file: PathBuf,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        dry_run: bool,
    },

    /// Report whether a line carries a trace tag
    Check {
        file: PathBuf,
        #[arg(long)]
        line: usize,
    },

    /// List every trace id in a file
    List { file: PathBuf },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            keyword: self.keyword.clone(),
            id_length: self.id_length,
            log_file: self.log_file.clone(),
            log_filter: self.log_level.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();

    if let Err(e) = logging::init(&config) {
        eprintln!("could not open log file: {}", e);
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<GadgetError>() {
            Some(gadget) if gadget.severity() == Severity::Info => {
                eprintln!("{}", gadget);
                ExitCode::SUCCESS
            }
            _ => {
                eprintln!("error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// 1-based CLI line to a zero-based index.
fn zero_based(line: usize) -> Result<usize> {
    line.checked_sub(1).context("lines are numbered from 1")
}

fn run(command: Command, config: &Config) -> Result<()> {
    let engine = Engine::new(config);

    match command {
        Command::Serve => adapter::run_adapter_mode(config)?,
        Command::Add {
            file,
            line,
            column,
            end_line,
            end_column,
            format,
            dry_run,
        } => {
            let mut doc = open(&file)?;
            let source = SourceText::new(doc.text());
            let start = source.offset_at(Position::new(zero_based(line)?, zero_based(column)?))?;
            let end = match (end_line, end_column) {
                (Some(l), Some(c)) => source.offset_at(Position::new(zero_based(l)?, zero_based(c)?))?,
                _ => start,
            };
            let selection = Span::new(start.min(end), start.max(end));

            let mut picker: Box<dyn FormatPicker> = match format {
                Some(f) => Box::new(Preselected(Some(f))),
                None => Box::new(PromptPicker::new(io::stdin().lock(), io::stderr())),
            };
            let outcome = engine.add_trace(doc.text(), selection, picker.as_mut())?;
            finish(&mut doc, outcome, dry_run, "added")?;
        }
        Command::Toggle { file, line, dry_run } => {
            let mut doc = open(&file)?;
            let outcome = engine.toggle_trace(doc.text(), zero_based(line)?)?;
            finish(&mut doc, outcome, dry_run, "toggled")?;
        }
        Command::Remove { file, line, dry_run } => {
            let mut doc = open(&file)?;
            let outcome = engine.remove_trace(doc.text(), zero_based(line)?)?;
            finish(&mut doc, outcome, dry_run, "removed")?;
        }
        Command::Check { file, line } => {
            let doc = open(&file)?;
            println!("{}", engine.is_tag_line(doc.text(), zero_based(line)?));
        }
        Command::List { file } => {
            let doc = open(&file)?;
            for trace in engine.list_traces(doc.text()) {
                let lines: Vec<String> = trace.lines.iter().map(|l| (l + 1).to_string()).collect();
                println!("{}\t{}", trace.id, lines.join(","));
            }
        }
    }
    Ok(())
}

fn open(file: &Path) -> Result<Document> {
    Document::open(file).with_context(|| format!("reading {}", file.display()))
}

fn finish(doc: &mut Document, outcome: TraceOutcome, dry_run: bool, verb: &str) -> Result<()> {
    let TraceOutcome { id, batch } = outcome;
    if dry_run {
        let preview = doc.preview(&batch)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(preview.as_bytes())?;
        stdout.flush()?;
    } else {
        commit(doc, &batch)?;
        eprintln!("{} trace {} ({} edits)", verb, id, batch.len());
    }
    Ok(())
}

fn commit(doc: &mut Document, batch: &EditBatch) -> Result<()> {
    doc.commit(batch)
        .with_context(|| format!("writing {}", doc.path().display()))
}
