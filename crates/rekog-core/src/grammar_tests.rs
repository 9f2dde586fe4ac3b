use crate::{Grammar, GrammarError, Recognizer};

fn digit_grammar() -> Grammar {
    let mut g = Grammar::new("digits");
    let digit = g.add_node(Recognizer::range(0x30, 0x39));
    g.add_rule("digit", digit);
    let digit_ref = g.rule_ref("digit");
    let num = g.add_node(Recognizer::Repetition {
        child: digit_ref,
        min: 1,
        max: None,
    });
    g.add_rule("num", num);
    g
}

#[test]
fn rule_names_are_case_insensitive() {
    let g = digit_grammar();

    let lower = g.find_rule("digit").unwrap();
    let upper = g.find_rule("DIGIT").unwrap();

    assert_eq!(lower, upper);
    assert_eq!(g.rule_name(lower), "digit");
}

#[test]
fn forward_reference_leaves_undefined_slot() {
    let mut g = Grammar::new("fwd");
    let later = g.rule_ref("later");
    g.add_rule("start", later);

    assert!(!g.is_complete());
    assert_eq!(g.undefined_rules().collect::<Vec<_>>(), ["later"]);
    assert_eq!(g.rule("later"), Err(GrammarError::UnknownRule("later".into())));
    assert_eq!(g.rule_count(), 1);

    let x = g.add_node(Recognizer::literal("x", true));
    g.add_rule("later", x);

    assert!(g.is_complete());
    assert!(g.rule("later").is_ok());
    assert_eq!(g.rule_count(), 2);
}

#[test]
fn add_rule_replaces_previous_root() {
    let mut g = Grammar::new("replace");
    let a = g.add_node(Recognizer::literal("a", true));
    let b = g.add_node(Recognizer::literal("b", true));

    let first = g.add_rule("x", a);
    let second = g.add_rule("X", b);

    assert_eq!(first, second);
    assert_eq!(g.rule_root(first), Some(b));
    assert_eq!(g.rule_count(), 1);
}

#[test]
fn unknown_rule_lookup() {
    let g = digit_grammar();

    assert_eq!(g.find_rule("nope"), None);
    let err = g.rule("nope").unwrap_err();
    assert_eq!(err.to_string(), "unknown rule `nope`");
}

#[test]
fn extend_rule_appends_to_choice() {
    let mut g = Grammar::new("ext");
    let a = g.add_node(Recognizer::literal("a", true));
    let b = g.add_node(Recognizer::literal("b", true));
    let c = g.add_node(Recognizer::literal("c", true));
    let ab = g.add_node(Recognizer::Choice(Box::new([a, b])));
    let id = g.add_rule("letters", ab);

    g.extend_rule("letters", c).unwrap();

    let root = g.rule_root(id).unwrap();
    assert_eq!(g.node(root), &Recognizer::Choice(Box::new([a, b, c])));
    // The original choice node is left alone.
    assert_eq!(g.node(ab), &Recognizer::Choice(Box::new([a, b])));
}

#[test]
fn extend_rule_wraps_non_choice_root() {
    let mut g = Grammar::new("ext");
    let a = g.add_node(Recognizer::literal("a", true));
    let b = g.add_node(Recognizer::literal("b", true));
    let id = g.add_rule("x", a);

    g.extend_rule("x", b).unwrap();

    let root = g.rule_root(id).unwrap();
    assert_eq!(g.node(root), &Recognizer::Choice(Box::new([a, b])));
}

#[test]
fn extend_undefined_rule_fails() {
    let mut g = Grammar::new("ext");
    let a = g.add_node(Recognizer::literal("a", true));
    g.declare_rule("ghost");

    assert_eq!(
        g.extend_rule("ghost", a),
        Err(GrammarError::UnknownRule("ghost".into()))
    );
}

#[test]
fn include_copies_missing_rules_only() {
    let mut base = Grammar::new("base");
    let d = base.add_node(Recognizer::range(0x30, 0x39));
    base.add_rule("digit", d);
    let digit_ref = base.rule_ref("digit");
    let two = base.add_node(Recognizer::Repetition {
        child: digit_ref,
        min: 2,
        max: Some(2),
    });
    base.add_rule("pair", two);

    let mut g = Grammar::new("local");
    let x = g.add_node(Recognizer::literal("x", false));
    g.add_rule("DIGIT", x);
    g.include(&base);

    assert!(g.is_complete());
    assert_eq!(g.rule_count(), 2);

    // Local definition wins.
    let digit = g.find_rule("digit").unwrap();
    assert_eq!(g.rule_root(digit), Some(x));

    // The copied rule references the local slot.
    let pair = g.find_rule("pair").unwrap();
    let root = g.rule_root(pair).unwrap();
    let Recognizer::Repetition { child, .. } = g.node(root) else {
        panic!("expected repetition");
    };
    assert_eq!(g.node(*child), &Recognizer::RuleRef(digit));
}

#[test]
fn mutation_discards_optimization() {
    let mut g = digit_grammar();
    g.optimize();
    assert!(g.is_optimized());

    g.add_node(Recognizer::literal("z", true));
    assert!(!g.is_optimized());
}

#[test]
fn render_rules() {
    let mut g = digit_grammar();
    let dash = g.add_node(Recognizer::literal("-", false));
    let num_ref = g.rule_ref("num");
    let opt = g.add_node(Recognizer::optional(dash));
    let seq = g.add_node(Recognizer::Sequence(Box::new([opt, num_ref])));
    g.add_rule("Signed", seq);

    assert_eq!(
        g.render(),
        "digit = %x30-39\nnum = 1*digit\nSigned = [%s\"-\"] num\n"
    );
}

#[test]
#[should_panic(expected = "unknown rule `missing`")]
fn ensure_rule_is_fatal() {
    digit_grammar().ensure_rule("missing");
}
