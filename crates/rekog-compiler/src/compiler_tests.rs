use indoc::indoc;
use rekog_core::{Grammar, core_rules};

use crate::test_utils::{compile, compile_errors};
use crate::{CompileError, Compiler, DiagnosticKind, compile_file};

fn rendered(grammar: &Grammar, name: &str) -> String {
    grammar
        .render_rule(grammar.rule(name).unwrap())
        .unwrap()
}

fn kinds(source: &str) -> Vec<DiagnosticKind> {
    compile_errors(source).iter().map(|d| d.kind()).collect()
}

#[test]
fn groups_and_options() {
    let grammar = compile("a = (\"x\" \"y\") / [b]\nb = \"z\"\n");

    assert_eq!(rendered(&grammar, "a"), r#"a = ("x" "y") / [b]"#);
    assert!(grammar.is_complete());
    assert!(grammar.is_optimized());
}

#[test]
fn string_case_sensitivity() {
    let grammar = compile(r#"s = %s"Ab" / "cd" / %i"EF""#);

    assert_eq!(rendered(&grammar, "s"), r#"s = %s"Ab" / "cd" / "EF""#);
}

#[test]
fn numeric_values() {
    let grammar = compile(indoc! {"
        crlf = %x0D.0A
        ab = %d65.66
        digit = %x30-39
    "});

    assert_eq!(rendered(&grammar, "crlf"), "crlf = %x0D.0A");
    assert_eq!(rendered(&grammar, "ab"), r#"ab = %s"AB""#);
    assert_eq!(rendered(&grammar, "digit"), "digit = %x30-39");
}

#[test]
fn repeats() {
    let grammar = compile(indoc! {"
        two = 2DIGIT
        one = 1*1DIGIT
        some = 1*ALPHA
        few = *3ALPHA
        any = *(ALPHA / DIGIT)
    "});

    assert_eq!(rendered(&grammar, "two"), "two = 2DIGIT");
    assert_eq!(rendered(&grammar, "one"), "one = DIGIT");
    assert_eq!(rendered(&grammar, "some"), "some = 1*ALPHA");
    assert_eq!(rendered(&grammar, "few"), "few = *3ALPHA");
    assert_eq!(rendered(&grammar, "any"), "any = *(ALPHA / DIGIT)");
}

#[test]
fn lists() {
    let grammar = compile(indoc! {"
        list = 1#token
        opt = #token
        pair = 1#2token
        token = 1*ALPHA
    "});

    insta::assert_snapshot!(rendered(&grammar, "list"), @r#"list = token *(*(%x20 / %x09) "," *(%x20 / %x09) token)"#);
    insta::assert_snapshot!(rendered(&grammar, "opt"), @r#"opt = [token *(*(%x20 / %x09) "," *(%x20 / %x09) token)]"#);
    insta::assert_snapshot!(rendered(&grammar, "pair"), @r#"pair = token [(*(%x20 / %x09) "," *(%x20 / %x09) token)]"#);
}

#[test]
fn incremental_alternatives() {
    let grammar = compile(indoc! {r#"
        a = "x"
        a =/ "y"
        A =/ "z"
    "#});

    assert_eq!(rendered(&grammar, "a"), r#"a = "x" / "y" / "z""#);
}

#[test]
fn rules_keep_document_order() {
    let compiled = Compiler::new("b = a\na = \"x\"\n").compile().unwrap();

    assert_eq!(compiled.grammar.render(), "b = a\na = \"x\"\n");
    assert_eq!(compiled.grammar.name(), "grammar");
    assert!(compiled.diagnostics.is_empty());
}

#[test]
fn names_are_case_insensitive() {
    let grammar = compile("Greeting = name\nNAME = \"x\"\n");

    assert!(grammar.is_complete());
    // references render with the first spelling of the name
    assert_eq!(rendered(&grammar, "greeting"), "Greeting = NAME");
}

#[test]
fn duplicate_definition() {
    let diagnostics = compile_errors("a = \"x\"\nA = \"y\"\n");

    insta::assert_snapshot!(diagnostics.to_string(), @"error at 10..11: `A` is already defined (fix: use `=/` to add alternatives) (related: first defined here at 0..1)");
}

#[test]
fn undefined_references() {
    let diagnostics = compile_errors("a = b c b\n");

    insta::assert_snapshot!(diagnostics.to_string(), @r"
    error at 4..5: `b` is not defined
    error at 6..7: `c` is not defined
    ");
}

#[test]
fn incomplete_grammar_warns() {
    let compiled = Compiler::new("a = b\n")
        .allow_incomplete(true)
        .compile()
        .unwrap();

    assert!(!compiled.grammar.is_complete());
    assert_eq!(compiled.diagnostics.warning_count(), 1);
    assert!(!compiled.diagnostics.has_errors());
}

#[test]
fn local_rules_shadow_base() {
    let core = core_rules();
    let compiled = Compiler::new("digit = %x30-39\nnum = 1*digit\n")
        .base(&core)
        .compile()
        .unwrap();

    assert!(compiled.diagnostics.is_empty());
    assert_eq!(rendered(&compiled.grammar, "DIGIT"), "digit = %x30-39");
    assert!(compiled.grammar.is_complete());
}

#[test]
fn rejected_base_override() {
    let core = core_rules();

    let err = Compiler::new("DIGIT = \"x\"\n")
        .base(&core)
        .reject_base_overrides(true)
        .compile()
        .unwrap_err();
    let diagnostics = err.diagnostics().unwrap();
    assert_eq!(
        diagnostics.iter().map(|d| d.kind()).collect::<Vec<_>>(),
        [DiagnosticKind::BaseRuleOverride]
    );

    let compiled = Compiler::new("DIGIT = \"x\"\n").base(&core).compile().unwrap();
    assert_eq!(rendered(&compiled.grammar, "DIGIT"), r#"DIGIT = "x""#);
    // HEXDIG now reaches the local DIGIT
    assert!(compiled.grammar.is_complete());
}

#[test]
fn incremental_needs_definition() {
    assert_eq!(kinds("a =/ \"x\"\n"), [DiagnosticKind::IncrementalUndefined]);

    let err = Compiler::new("missing =/ \"x\"\n")
        .base(&core_rules())
        .compile()
        .unwrap_err();
    insta::assert_snapshot!(err.diagnostics().unwrap().to_string(), @"error at 0..7: `missing` must be defined with `=` before `=/`");
}

#[test]
fn incremental_extends_base_rule() {
    let core = core_rules();
    let grammar = compile("WSP =/ %x0C\n");
    assert_eq!(rendered(&grammar, "WSP"), "WSP = SP / HTAB / %x0C");
    assert!(grammar.is_complete());

    // `=` after `=/` is still out of order
    let err = Compiler::new("ALPHA =/ %x391-3A9\nword = 1*ALPHA\nALPHA = \"x\"\n")
        .base(&core)
        .compile()
        .unwrap_err();
    let kinds: Vec<_> = err.diagnostics().unwrap().iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, [DiagnosticKind::IncrementalUndefined]);
}

#[test]
fn invalid_repeat() {
    let diagnostics = compile_errors("a = 3*2\"x\"\n");

    insta::assert_snapshot!(diagnostics.to_string(), @"error at 4..7: repeat minimum exceeds its maximum: 3 > 2");
}

#[test]
fn invalid_range() {
    let diagnostics = compile_errors("a = %x39-30\n");

    insta::assert_snapshot!(diagnostics.to_string(), @"error at 4..11: numeric range is empty: `%x39-30`");
}

#[test]
fn prose_is_rejected() {
    assert_eq!(kinds("a = <anything>\n"), [DiagnosticKind::ProseUnsupported]);
}

#[test]
fn parse_errors_skip_lowering() {
    assert_eq!(kinds("a = (b\n"), [DiagnosticKind::UnclosedGroup]);
}

#[test]
fn stray_tokens_before_final_newline() {
    assert_eq!(kinds("a = \"x\" )\n"), [DiagnosticKind::UnexpectedToken]);
    assert_eq!(kinds("a = \"x\"\n= b\n"), [DiagnosticKind::ExpectedRuleName]);
    assert_eq!(kinds("a = \"x\"\n= b"), [DiagnosticKind::ExpectedRuleName]);
}

#[test]
fn recursion_limit() {
    let err = Compiler::new("a = ((\"x\"))\n")
        .recursion_limit(1)
        .compile()
        .unwrap_err();

    let kinds: Vec<_> = err.diagnostics().unwrap().iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, [DiagnosticKind::NestingTooDeep]);
    assert_eq!(err.to_string(), "ABNF compilation failed with 1 errors");
}

#[test]
fn compile_file_names_grammar_after_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greeting.abnf");
    std::fs::write(&path, "greeting = \"hi\" SP name\nname = 1*ALPHA\n").unwrap();

    let core = core_rules();
    let compiled = compile_file(&path, Some(&core)).unwrap();

    assert_eq!(compiled.grammar.name(), "greeting");
    assert!(compiled.grammar.is_complete());
}

#[test]
fn compile_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = compile_file(dir.path().join("missing.abnf"), None).unwrap_err();

    assert!(matches!(err, CompileError::Io { .. }));
    assert!(err.diagnostics().is_none());
    assert!(err.to_string().starts_with("cannot read `"));
}
