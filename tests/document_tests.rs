use gadgets_debug::parser::{DisplayFormat, Span};
use gadgets_debug::{Document, Engine, GadgetError, Preselected};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CONTRACT: &str = "contract C {\n    function f(uint v) external {\n        v += 1;\n        assembly {\n            let w := v\n        }\n    }\n}\n";

fn write_contract(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("C.sol");
    fs::write(&path, CONTRACT).expect("write fixture");
    path
}

fn cursor() -> Span {
    let at = CONTRACT.find("let w := v").unwrap() + "let w := ".len();
    Span::point(at)
}

#[cfg(test)]
mod document_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_commit_writes_whole_batch() {
        let dir = TempDir::new().unwrap();
        let path = write_contract(&dir);

        let mut doc = Document::open(&path).unwrap();
        let outcome = Engine::default()
            .add_trace(doc.text(), cursor(), &mut Preselected(Some(DisplayFormat::Hex)))
            .unwrap();
        doc.commit(&outcome.batch).unwrap();

        let id = outcome.id;
        let expected = format!(
            "contract C {{\n    function f(uint v) external {{\n        uint Debugv; // [gadgets-debug-var:{id}]\n        v += 1;\n        assembly {{\n            let w := v\n            Debugv := v; // [gadgets-debug-assign:{id}]\n        }}\n        console.log(\"Debugv %x\", Debugv); // [gadgets-debug-log:{id}]\n    }}\n}}\n"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
        assert_eq!(doc.text(), expected);

        // The snapshot moved forward, so the trace can be removed in place.
        let removal = Engine::default().remove_trace(doc.text(), 2).unwrap();
        doc.commit(&removal.batch).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONTRACT);
    }

    #[test]
    fn test_stale_snapshot_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = write_contract(&dir);

        let mut doc = Document::open(&path).unwrap();
        let outcome = Engine::default()
            .add_trace(doc.text(), cursor(), &mut Preselected(Some(DisplayFormat::Uint)))
            .unwrap();

        let edited = format!("// edited elsewhere\n{}", CONTRACT);
        fs::write(&path, &edited).unwrap();

        let err = doc.commit(&outcome.batch).expect_err("stale");
        assert!(matches!(err, GadgetError::Stale(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), edited);
        assert_eq!(doc.text(), CONTRACT);
    }

    #[test]
    fn test_preview_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_contract(&dir);

        let doc = Document::open(&path).unwrap();
        let outcome = Engine::default()
            .add_trace(doc.text(), cursor(), &mut Preselected(Some(DisplayFormat::Bytes)))
            .unwrap();
        let preview = doc.preview(&outcome.batch).unwrap();
        assert_eq!(preview.lines().count(), CONTRACT.lines().count() + 4);
        assert_eq!(fs::read_to_string(&path).unwrap(), CONTRACT);
    }
}
