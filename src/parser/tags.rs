use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common prefix of every marker, e.g. `[gadgets-debug-var:k3x9qa]`.
pub const TAG_PREFIX: &str = "gadgets-debug";

pub const DEFAULT_ID_LENGTH: usize = 6;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

static VAR_TAG: Lazy<Regex> = Lazy::new(|| variant_regex("var"));
static ASSIGN_TAG: Lazy<Regex> = Lazy::new(|| variant_regex("assign"));
static LOG_TAG: Lazy<Regex> = Lazy::new(|| variant_regex("log"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| variant_regex("(?:var|assign|log)"));
static TAG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[gadgets-debug-(?:var|assign|log):").expect("valid tag-line regex"));

fn variant_regex(variant: &str) -> Regex {
    Regex::new(&format!(r"\[{}-{}:([a-z0-9]+)\]", TAG_PREFIX, variant)).expect("valid tag regex")
}

/// Which statement of a trace a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagVariant {
    #[serde(rename = "var")]
    Declaration,
    #[serde(rename = "assign")]
    Assignment,
    Log,
}

impl TagVariant {
    pub const ALL: [TagVariant; 3] = [TagVariant::Declaration, TagVariant::Assignment, TagVariant::Log];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagVariant::Declaration => "var",
            TagVariant::Assignment => "assign",
            TagVariant::Log => "log",
        }
    }
}

/// Correlation id shared by the lines of one trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Accepts any non-empty `[a-z0-9]+` id, the form markers may carry.
    pub fn parse(s: &str) -> Option<Self> {
        let valid = !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        valid.then(|| TraceId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Random id of [`DEFAULT_ID_LENGTH`] characters. Not cryptographic.
pub fn make_trace_id() -> TraceId {
    make_trace_id_with_len(DEFAULT_ID_LENGTH)
}

pub fn make_trace_id_with_len(len: usize) -> TraceId {
    let mut rng = rand::thread_rng();
    let id = (0..len.max(1))
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    TraceId(id)
}

/// Matcher for one variant's marker; capture group 1 is the id.
pub fn tag_pattern(variant: TagVariant) -> &'static Regex {
    match variant {
        TagVariant::Declaration => &VAR_TAG,
        TagVariant::Assignment => &ASSIGN_TAG,
        TagVariant::Log => &LOG_TAG,
    }
}

pub fn render_tag(variant: TagVariant, id: &TraceId) -> String {
    format!("[{}-{}:{}]", TAG_PREFIX, variant.as_str(), id)
}

/// Id of the first marker on the line, whatever its variant.
pub fn line_matches_any_variant(line: &str) -> Option<TraceId> {
    ANY_TAG
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| TraceId(m.as_str().to_string()))
}

/// Whether the line looks like generated instrumentation.
///
/// Hosts call this on every selection change instead of keeping a flag.
pub fn is_tag_line(line: &str) -> bool {
    TAG_LINE.is_match(line)
}

/// True when the line carries a marker of any variant with exactly `id`.
pub fn line_has_id(line: &str, id: &TraceId) -> bool {
    TagVariant::ALL.iter().any(|variant| {
        tag_pattern(*variant)
            .captures_iter(line)
            .any(|caps| caps.get(1).map(|m| m.as_str()) == Some(id.as_str()))
    })
}

/// One id found in a document and the zero-based lines that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceLocation {
    pub id: TraceId,
    pub lines: Vec<usize>,
}

/// Every distinct id in the lines, in first-seen order.
pub fn scan_trace_ids(lines: &[&str]) -> Vec<TraceLocation> {
    let mut found: Vec<TraceLocation> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        for caps in ANY_TAG.captures_iter(line) {
            let Some(m) = caps.get(1) else { continue };
            match found.iter_mut().find(|t| t.id.as_str() == m.as_str()) {
                Some(loc) => {
                    if loc.lines.last() != Some(&i) {
                        loc.lines.push(i);
                    }
                }
                None => found.push(TraceLocation {
                    id: TraceId(m.as_str().to_string()),
                    lines: vec![i],
                }),
            }
        }
    }
    found
}
