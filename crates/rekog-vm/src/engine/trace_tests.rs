use super::{Matcher, PrintTracer};
use crate::test_utils::grammar;

#[test]
fn print_tracer_lines() {
    let g = grammar("digit = %x30-39\nnum = 1*digit\n");
    let observed = vec![false; g.declared_count()];
    let mut tracer = PrintTracer::new(&g);

    let result = Matcher::new(&g, b"12a", &observed, &mut tracer).run(g.rule("num").unwrap(), 0);

    assert_eq!(result.map(|(end, _)| end), Some(2));
    insta::assert_snapshot!(tracer.lines().join("\n"), @r"
    > num @0
      > digit @0
      < digit 0..1
      > digit @1
      < digit 1..2
      > digit @2
      x digit @2
    < num 0..2
    ");
}

#[test]
fn failed_root_is_traced() {
    let g = grammar(r#"greeting = "hello" / "hi""#);
    let observed = vec![false; g.declared_count()];
    let mut tracer = PrintTracer::new(&g);

    let result = Matcher::new(&g, b"hey", &observed, &mut tracer).run(g.rule("greeting").unwrap(), 0);

    assert!(result.is_none());
    assert_eq!(tracer.lines(), ["> greeting @0", "x greeting @0"]);
}
