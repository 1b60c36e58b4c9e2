//! Golden signal corpus
//!
//! Runs every case in tests/golden/signals.yaml through the default
//! transpiler and checks:
//! - The error strings match exactly and in order
//! - Listed signal fields hold their expected wire values
//! - Every input line is rendered, plus one line per inferred default
//! - Case ids are unique

use std::collections::HashSet;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{Map, Value};

use signal_transpiler::transpile;
use signal_transpiler::transpiler::INFERRED_MARKER;

#[derive(Debug, Deserialize)]
struct GoldenCase {
    id: String,
    input: String,
    errors: Vec<String>,
    #[serde(default)]
    signal: Map<String, Value>,
}

fn load_corpus() -> Vec<GoldenCase> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden/signals.yaml");
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

#[test]
fn golden_corpus_ids_are_unique() {
    let corpus = load_corpus();
    assert!(!corpus.is_empty());
    let mut seen = HashSet::new();
    for case in &corpus {
        assert!(seen.insert(case.id.as_str()), "duplicate id {}", case.id);
    }
}

#[test]
fn golden_corpus_errors_match() {
    for case in load_corpus() {
        let output = transpile(&case.input);
        assert_eq!(output.errors, case.errors, "case {}", case.id);
        assert_eq!(output.has_errors(), !case.errors.is_empty(), "case {}", case.id);
    }
}

#[test]
fn golden_corpus_signal_fields_match() {
    for case in load_corpus() {
        let output = transpile(&case.input);
        let actual = serde_json::to_value(&output.signal_input).unwrap();
        for (field, expected) in &case.signal {
            assert_eq!(
                actual.get(field),
                Some(expected),
                "case {} field {}",
                case.id,
                field
            );
        }
    }
}

#[test]
fn golden_corpus_renders_every_line() {
    for case in load_corpus() {
        let output = transpile(&case.input);
        let line_count = case.input.split('\n').count();
        assert!(
            output.tokenized_input.len() >= line_count,
            "case {} rendered {} of {} lines",
            case.id,
            output.tokenized_input.len(),
            line_count
        );
        for line in &output.tokenized_input[line_count..] {
            let last = line.last().expect("inferred line has tokens");
            assert_eq!(last.input, INFERRED_MARKER, "case {}", case.id);
        }
    }
}
