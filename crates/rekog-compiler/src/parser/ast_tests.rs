use super::ast::{Expr, RepeatOp};
use super::parse;

fn first_body(source: &str) -> Expr {
    let (parse, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "{diagnostics}");
    parse
        .root()
        .rules()
        .next()
        .and_then(|rule| rule.body())
        .expect("rule with a body")
}

#[test]
fn rules_in_document_order() {
    let (parse, _) = parse("a = b\nc =/ d\n");
    let rules: Vec<_> = parse.root().rules().collect();

    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].name().unwrap().text(), "a");
    assert!(!rules[0].is_incremental());
    assert_eq!(rules[1].name().unwrap().text(), "c");
    assert!(rules[1].is_incremental());
    assert_eq!(rules[1].defined_as().unwrap().text(), "=/");
}

#[test]
fn alternation_branches() {
    let Expr::Alternation(alt) = first_body("a = b / \"c\" / %x20") else {
        panic!("expected alternation");
    };
    let kinds: Vec<_> = alt
        .branches()
        .map(|b| match b {
            Expr::Ref(_) => "ref",
            Expr::Str(_) => "str",
            Expr::Num(_) => "num",
            _ => "other",
        })
        .collect();

    assert_eq!(kinds, ["ref", "str", "num"]);
}

#[test]
fn repeat_forms() {
    let Expr::Concatenation(cat) = first_body("a = 3x *y 2*5z 1#w *4v") else {
        panic!("expected concatenation");
    };
    let repeats: Vec<_> = cat
        .items()
        .map(|item| {
            let Expr::Repetition(rep) = item else {
                panic!("expected repetition");
            };
            let repeat = rep.repeat().unwrap();
            (
                repeat.op(),
                repeat.min().map(|t| t.text().to_owned()),
                repeat.max().map(|t| t.text().to_owned()),
            )
        })
        .collect();

    assert_eq!(
        repeats,
        [
            (RepeatOp::Exact, Some("3".to_owned()), None),
            (RepeatOp::Range, None, None),
            (RepeatOp::Range, Some("2".to_owned()), Some("5".to_owned())),
            (RepeatOp::List, Some("1".to_owned()), None),
            (RepeatOp::Range, None, Some("4".to_owned())),
        ]
    );
}

#[test]
fn repetition_element() {
    let Expr::Repetition(rep) = first_body("a = 2\"ab\"") else {
        panic!("expected repetition");
    };
    let Some(Expr::Str(s)) = rep.element() else {
        panic!("expected string element");
    };

    assert_eq!(s.token().unwrap().text(), "\"ab\"");
}

#[test]
fn group_and_option_bodies() {
    let Expr::Concatenation(cat) = first_body("a = (b / c) [d e]") else {
        panic!("expected concatenation");
    };
    let items: Vec<_> = cat.items().collect();

    let Expr::Group(group) = &items[0] else {
        panic!("expected group");
    };
    assert!(matches!(group.body(), Some(Expr::Alternation(_))));

    let Expr::Optional(option) = &items[1] else {
        panic!("expected option");
    };
    assert!(matches!(option.body(), Some(Expr::Concatenation(_))));
}

#[test]
fn text_range_covers_node() {
    let body = first_body("name = <some prose>");
    let Expr::Prose(prose) = &body else {
        panic!("expected prose");
    };

    assert_eq!(prose.token().unwrap().text(), "<some prose>");
    assert_eq!(u32::from(body.text_range().start()), 7);
    assert_eq!(u32::from(body.text_range().end()), 19);
}
