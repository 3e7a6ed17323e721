// tests/adapter_tests.rs
// Drives the stdio protocol server with framed requests

use gadgets_debug::adapter::{Server, MAX_CONTENT_LENGTH};
use gadgets_debug::{Config, GadgetError};
use serde_json::{json, Value};
use std::io::Cursor;

fn frame(seq: u64, command: &str, arguments: Option<Value>) -> String {
    let mut msg = json!({ "seq": seq, "type": "request", "command": command });
    if let Some(args) = arguments {
        msg["arguments"] = args;
    }
    let body = msg.to_string();
    format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
}

// Split server output back into JSON messages.
fn unframe(output: &[u8]) -> Vec<Value> {
    let text = String::from_utf8(output.to_vec()).expect("utf8 output");
    let mut messages = Vec::new();
    let mut rest = text.as_str();
    while let Some(header_end) = rest.find("\r\n\r\n") {
        let len: usize = rest["Content-Length: ".len()..header_end]
            .trim()
            .parse()
            .expect("content length");
        let body_start = header_end + 4;
        messages.push(serde_json::from_str(&rest[body_start..body_start + len]).expect("json body"));
        rest = &rest[body_start + len..];
    }
    messages
}

fn serve(requests: &[String]) -> Vec<Value> {
    let (result, messages) = serve_raw(requests.concat());
    result.expect("server runs");
    messages
}

fn serve_raw(input: String) -> (gadgets_debug::Result<()>, Vec<Value>) {
    let mut output = Vec::new();
    let result = {
        let mut server = Server::new(Cursor::new(input.into_bytes()), &mut output, &Config::default());
        server.run()
    };
    (result, unframe(&output))
}

#[cfg(test)]
mod adapter_tests {
    use super::*;

    #[test]
    fn test_initialize_then_initialized_event() {
        let messages = serve(&[frame(1, "initialize", None)]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["type"], "response");
        assert_eq!(messages[0]["request_seq"], 1);
        assert_eq!(messages[0]["success"], true);
        assert_eq!(messages[0]["body"]["formats"], json!(["uint", "hex", "bytes"]));
        assert_eq!(messages[0]["body"]["keyword"], "assembly");
        assert_eq!(messages[1]["type"], "event");
        assert_eq!(messages[1]["event"], "initialized");
    }

    #[test]
    fn test_add_trace_returns_three_edits() {
        let args = json!({
            "text": "assembly { x := 1 }",
            "selection": {
                "start": { "line": 0, "character": 11 },
                "end": { "line": 0, "character": 12 }
            },
            "format": "hex"
        });
        let messages = serve(&[frame(1, "addTrace", Some(args))]);
        assert_eq!(messages.len(), 1);
        let response = &messages[0];
        assert_eq!(response["success"], true);

        let id = response["body"]["id"].as_str().expect("id");
        assert_eq!(id.len(), 6);
        let edits = response["body"]["edits"].as_array().expect("edits");
        assert_eq!(edits.len(), 3);

        assert_eq!(edits[0]["range"]["start"], json!({ "line": 0, "character": 0 }));
        assert_eq!(
            edits[0]["newText"],
            format!("uint Debugx; // [gadgets-debug-var:{id}]\n")
        );
        assert_eq!(edits[1]["range"]["start"], json!({ "line": 0, "character": 19 }));
        assert_eq!(
            edits[1]["newText"],
            format!("\nDebugx := x; // [gadgets-debug-assign:{id}]")
        );
        assert_eq!(
            edits[2]["newText"],
            format!("\nconsole.log(\"Debugx %x\", Debugx); // [gadgets-debug-log:{id}]")
        );
    }

    #[test]
    fn test_positions_count_characters() {
        // `é` is two bytes but one character.
        let args = json!({
            "text": "// é\nassembly { é := 1 }\n",
            "selection": {
                "start": { "line": 1, "character": 11 },
                "end": { "line": 1, "character": 12 }
            },
            "format": "uint"
        });
        let messages = serve(&[frame(1, "addTrace", Some(args))]);
        let edits = messages[0]["body"]["edits"].as_array().expect("edits");
        let id = messages[0]["body"]["id"].as_str().expect("id");
        assert_eq!(edits[1]["range"]["start"], json!({ "line": 2, "character": 0 }));
        assert_eq!(
            edits[1]["newText"],
            format!("Debugé := é; // [gadgets-debug-assign:{id}]\n")
        );
    }

    #[test]
    fn test_missing_format_is_a_cancellation() {
        let args = json!({
            "text": "assembly { x := 1 }",
            "selection": {
                "start": { "line": 0, "character": 11 },
                "end": { "line": 0, "character": 11 }
            }
        });
        let messages = serve(&[frame(1, "addTrace", Some(args))]);
        assert_eq!(messages[0]["success"], false);
        assert_eq!(messages[1]["event"], "showMessage");
        assert_eq!(messages[1]["body"]["level"], "info");
    }

    #[test]
    fn test_toggle_without_tag_signals_info() {
        let args = json!({ "text": "assembly {\n  x := 1\n}\n", "line": 1 });
        let messages = serve(&[frame(1, "toggleTrace", Some(args))]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["success"], false);
        assert_eq!(
            messages[0]["message"],
            "No gadget debug tag found on current line."
        );
        assert_eq!(messages[1]["body"]["level"], "info");
    }

    #[test]
    fn test_remove_trace_deletes_tagged_lines() {
        let text = "uint Debugx; // [gadgets-debug-var:ab12cd]\nassembly {\n  x := 1\n  Debugx := x; // [gadgets-debug-assign:ab12cd]\n}\n";
        let args = json!({ "text": text, "line": 3 });
        let messages = serve(&[frame(1, "removeTrace", Some(args))]);
        assert_eq!(messages[0]["success"], true);
        assert_eq!(messages[0]["body"]["id"], "ab12cd");
        let edits = messages[0]["body"]["edits"].as_array().expect("edits");
        assert_eq!(edits.len(), 2);
        assert_eq!(
            edits[0]["range"],
            json!({ "start": { "line": 0, "character": 0 }, "end": { "line": 1, "character": 0 } })
        );
        assert_eq!(
            edits[1]["range"],
            json!({ "start": { "line": 3, "character": 0 }, "end": { "line": 4, "character": 0 } })
        );
        assert_eq!(edits[1]["newText"], "");
    }

    #[test]
    fn test_is_tag_line_and_list() {
        let text = "x\n// [gadgets-debug-log:k1]\n";
        let messages = serve(&[
            frame(1, "isTagLine", Some(json!({ "text": text, "line": 1 }))),
            frame(2, "isTagLine", Some(json!({ "text": text, "line": 0 }))),
            frame(3, "listTraces", Some(json!({ "text": text }))),
        ]);
        assert_eq!(messages[0]["body"]["isTagLine"], true);
        assert_eq!(messages[1]["body"]["isTagLine"], false);
        assert_eq!(messages[2]["body"]["traces"], json!([{ "id": "k1", "lines": [1] }]));
    }

    #[test]
    fn test_unknown_command_and_disconnect() {
        let messages = serve(&[
            frame(1, "stepIn", None),
            frame(2, "disconnect", None),
            frame(3, "initialize", None),
        ]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["success"], false);
        assert_eq!(messages[1]["command"], "disconnect");
        assert_eq!(messages[1]["success"], true);
    }

    #[test]
    fn test_missing_arguments_are_reported() {
        let messages = serve(&[frame(1, "removeTrace", None)]);
        assert_eq!(messages[0]["success"], false);
        assert_eq!(messages[1]["body"]["level"], "error");
    }

    #[test]
    fn test_malformed_body_is_skipped() {
        let input = format!("Content-Length: 5\r\n\r\n{{oops{}", frame(2, "initialize", None));
        let messages = serve(&[input]);
        assert_eq!(messages[0]["request_seq"], 2);
        assert_eq!(messages[0]["success"], true);
    }

    #[test]
    fn test_unreadable_length_closes_the_stream() {
        let input = format!(
            "Content-Length: lots\r\n\r\n{}{}",
            frame(1, "initialize", None),
            frame(2, "initialize", None)
        );
        let (result, messages) = serve_raw(input);
        assert!(matches!(result, Err(GadgetError::Framing(_))));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_oversized_body_is_drained() {
        let len = MAX_CONTENT_LENGTH + 1;
        let input = format!(
            "Content-Length: {}\r\n\r\n{}{}",
            len,
            " ".repeat(len),
            frame(7, "initialize", None)
        );
        let messages = serve(&[input]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["request_seq"], 7);
        assert_eq!(messages[1]["event"], "initialized");
    }
}
