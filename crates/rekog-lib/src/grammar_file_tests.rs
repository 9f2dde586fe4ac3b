use rekog_bytecode::{Error, FormatError};
use rekog_core::{Grammar, core_rules};
use rekog_vm::DebugParser;

use crate::GrammarFile;
use crate::test_utils::grammar;

#[test]
fn save_then_load_matches_the_same_inputs() {
    let original = grammar("digit = %x30-39\nnum = 1*digit\n");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("num.grammar");

    original.save(&path).unwrap();
    let loaded = Grammar::load(&path).unwrap();

    assert_eq!(loaded.name(), "test");
    assert!(loaded.is_optimized());
    for input in ["12a", "7", "", "x1"] {
        let before = DebugParser::new(&original).parse_input("num", input);
        let after = DebugParser::new(&loaded).parse_input("num", input);
        assert_eq!(before, after, "input {input:?}");
    }
}

#[test]
fn core_rules_survive_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("core.grammar");

    core_rules().save(&path).unwrap();
    let loaded = Grammar::load(&path).unwrap();

    assert_eq!(loaded.render(), core_rules().render());
}

#[test]
fn incomplete_grammar_is_refused() {
    let g = crate::test_utils::incomplete_grammar("a = b\n");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.grammar");

    let err = g.save(&path).unwrap_err();
    assert!(matches!(err, Error::Incomplete { ref rules, .. } if rules == &["b"]));
    assert!(!path.exists());
}

#[test]
fn text_file_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("num.abnf");
    std::fs::write(&path, "num = 1*DIGIT\n".repeat(8)).unwrap();

    let err = Grammar::load(&path).unwrap_err();
    assert!(matches!(err, Error::Format(FormatError::InvalidMagic)));
}

#[test]
fn missing_file_is_io() {
    let dir = tempfile::tempdir().unwrap();
    let err = Grammar::load(dir.path().join("nope.grammar")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
