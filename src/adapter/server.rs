use super::protocol::{
    AddTraceArgs, LineArgs, Message, MessageContent, TagLineBody, TextArgs, TraceBody, TracesBody,
};
use crate::config::Config;
use crate::engine::{Engine, Preselected, TraceOutcome};
use crate::error::{GadgetError, Result};
use crate::parser::{DisplayFormat, SourceText, Span, TAG_PREFIX};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Read, Write};
use tracing::{debug, info, warn};

/// Largest message body the server will buffer.
pub const MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Content-Length framed JSON server for an editor host.
///
/// The host owns the buffer: it sends the full text with each request and
/// applies the returned edits itself as one workspace edit.
pub struct Server<R, W> {
    seq: u64,
    reader: R,
    writer: W,
    engine: Engine,
    keyword: String,
}

impl<R: BufRead, W: Write> Server<R, W> {
    pub fn new(reader: R, writer: W, config: &Config) -> Self {
        Self {
            seq: 0,
            reader,
            writer,
            engine: Engine::new(config),
            keyword: config.keyword.clone(),
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn send_response(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        message: Option<String>,
        body: Option<Value>,
    ) -> Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: MessageContent::Response {
                request_seq,
                success,
                command,
                message,
                body,
            },
        };
        self.send_message(&msg)
    }

    pub fn send_event(&mut self, event: &str, body: Option<Value>) -> Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "event".to_string(),
            content: MessageContent::Event {
                event: event.to_string(),
                body,
            },
        };
        self.send_message(&msg)
    }

    fn send_message(&mut self, msg: &Message) -> Result<()> {
        let json = serde_json::to_string(msg).map_err(|e| GadgetError::Protocol(e.to_string()))?;
        write!(self.writer, "Content-Length: {}\r\n\r\n{}", json.len(), json)?;
        self.writer.flush()?;
        debug!(bytes = json.len(), "sent message");
        Ok(())
    }

    /// Next framed message, `Ok(None)` at end of input.
    ///
    /// A body that is not valid JSON, or longer than `MAX_CONTENT_LENGTH`, is
    /// consumed and reported as `Protocol`. A header whose length cannot be
    /// read leaves the stream position unknown and is reported as `Framing`.
    pub fn read_message(&mut self) -> Result<Option<Message>> {
        let mut content_length: Option<usize> = None;
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if content_length.is_some() {
                    break;
                }
                continue;
            }
            if let Some(value) = line.strip_prefix("Content-Length:") {
                let len = value
                    .trim()
                    .parse()
                    .map_err(|_| GadgetError::Framing(format!("bad header: {}", line)))?;
                content_length = Some(len);
            }
        }

        let len = content_length.unwrap_or(0);
        if len > MAX_CONTENT_LENGTH {
            io::copy(&mut (&mut self.reader).take(len as u64), &mut io::sink())?;
            return Err(GadgetError::Protocol(format!(
                "message of {} bytes exceeds {} byte limit",
                len, MAX_CONTENT_LENGTH
            )));
        }

        let mut buffer = vec![0u8; len];
        self.reader.read_exact(&mut buffer)?;
        serde_json::from_slice(&buffer)
            .map(Some)
            .map_err(|e| GadgetError::Protocol(e.to_string()))
    }

    /// Serve requests until `disconnect` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let msg = match self.read_message() {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    info!("input closed");
                    return Ok(());
                }
                Err(GadgetError::Protocol(e)) => {
                    warn!(error = %e, "dropping malformed message");
                    continue;
                }
                Err(GadgetError::Framing(e)) => {
                    warn!(error = %e, "closing unreadable stream");
                    return Err(GadgetError::Framing(e));
                }
                Err(e) => return Err(e),
            };

            match msg.content {
                MessageContent::Request { command, arguments } => {
                    debug!(seq = msg.seq, command = %command, "received request");
                    if command == "disconnect" {
                        self.send_response(msg.seq, command, true, None, None)?;
                        info!("disconnect requested");
                        return Ok(());
                    }
                    self.dispatch(msg.seq, command, arguments)?;
                }
                _ => debug!(seq = msg.seq, "ignoring non-request message"),
            }
        }
    }

    fn dispatch(&mut self, seq: u64, command: String, arguments: Option<Value>) -> Result<()> {
        let outcome = match command.as_str() {
            "initialize" => {
                let body = json!({
                    "formats": DisplayFormat::ALL,
                    "tagPrefix": TAG_PREFIX,
                    "keyword": self.keyword,
                });
                self.send_response(seq, command, true, None, Some(body))?;
                return self.send_event("initialized", None);
            }
            "addTrace" => self.handle_add_trace(arguments),
            "toggleTrace" => self.handle_line_op(arguments, |engine, text, line| {
                engine.toggle_trace(text, line)
            }),
            "removeTrace" => self.handle_line_op(arguments, |engine, text, line| {
                engine.remove_trace(text, line)
            }),
            "isTagLine" => parse_args::<LineArgs>(arguments).and_then(|args| {
                to_value(&TagLineBody {
                    is_tag_line: self.engine.is_tag_line(&args.text, args.line),
                })
            }),
            "listTraces" => parse_args::<TextArgs>(arguments).and_then(|args| {
                to_value(&TracesBody {
                    traces: self.engine.list_traces(&args.text),
                })
            }),
            _ => {
                warn!(command = %command, "unhandled command");
                let message = format!("Unknown command: {}", command);
                return self.send_response(seq, command, false, Some(message), None);
            }
        };

        match outcome {
            Ok(body) => self.send_response(seq, command, true, None, Some(body)),
            Err(e) => {
                let level = e.severity().as_str();
                info!(command = %command, level, error = %e, "request aborted");
                self.send_response(seq, command, false, Some(e.to_string()), None)?;
                self.send_event(
                    "showMessage",
                    Some(json!({ "level": level, "message": e.to_string() })),
                )
            }
        }
    }

    fn handle_add_trace(&mut self, arguments: Option<Value>) -> Result<Value> {
        let args: AddTraceArgs = parse_args(arguments)?;
        let source = SourceText::new(&args.text);
        let start = source.offset_at(args.selection.start)?;
        let end = source.offset_at(args.selection.end)?;
        let selection = Span::new(start.min(end), start.max(end));

        let outcome = self
            .engine
            .add_trace(&args.text, selection, &mut Preselected(args.format))?;
        trace_body(&source, outcome)
    }

    fn handle_line_op<F>(&mut self, arguments: Option<Value>, op: F) -> Result<Value>
    where
        F: FnOnce(&Engine, &str, usize) -> Result<TraceOutcome>,
    {
        let args: LineArgs = parse_args(arguments)?;
        let outcome = op(&self.engine, &args.text, args.line)?;
        trace_body(&SourceText::new(&args.text), outcome)
    }
}

fn trace_body(source: &SourceText<'_>, outcome: TraceOutcome) -> Result<Value> {
    to_value(&TraceBody {
        edits: outcome.batch.to_wire(source),
        id: outcome.id,
    })
}

fn parse_args<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T> {
    let value = arguments.ok_or_else(|| GadgetError::Protocol("missing arguments".to_string()))?;
    serde_json::from_value(value).map_err(|e| GadgetError::Protocol(e.to_string()))
}

fn to_value<T: Serialize>(body: &T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| GadgetError::Protocol(e.to_string()))
}
