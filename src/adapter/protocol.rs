use crate::instrument::WireEdit;
use crate::parser::{DisplayFormat, Position, TraceId, TraceLocation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Request {
        command: String,
        arguments: Option<Value>,
    },
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        message: Option<String>,
        body: Option<Value>,
    },
    Event {
        event: String,
        body: Option<Value>,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SelectionArgs {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Deserialize)]
pub struct AddTraceArgs {
    pub text: String,
    pub selection: SelectionArgs,
    #[serde(default)]
    pub format: Option<DisplayFormat>,
}

#[derive(Debug, Deserialize)]
pub struct LineArgs {
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Deserialize)]
pub struct TextArgs {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TraceBody {
    pub id: TraceId,
    pub edits: Vec<WireEdit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagLineBody {
    pub is_tag_line: bool,
}

#[derive(Debug, Serialize)]
pub struct TracesBody {
    pub traces: Vec<TraceLocation>,
}
