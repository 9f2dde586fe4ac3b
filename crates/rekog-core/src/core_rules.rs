//! RFC 5234 appendix B core rules.

use crate::grammar::Grammar;
use crate::recognizer::{NodeId, Recognizer};

/// Names defined by [`core_rules`].
pub const CORE_RULE_NAMES: &[&str] = &[
    "ALPHA", "BIT", "CHAR", "CR", "CRLF", "CTL", "DIGIT", "DQUOTE", "HEXDIG", "HTAB", "LF",
    "LWSP", "OCTET", "SP", "VCHAR", "WSP",
];

/// Builds a grammar holding only the core rules, ready to be used as a base.
pub fn core_rules() -> Grammar {
    let mut g = Grammar::new("core");

    let upper = g.add_node(Recognizer::range(0x41, 0x5A));
    let lower = g.add_node(Recognizer::range(0x61, 0x7A));
    let alpha = choice(&mut g, &[upper, lower]);
    g.add_rule("ALPHA", alpha);

    let zero = g.add_node(Recognizer::char(0x30));
    let one = g.add_node(Recognizer::char(0x31));
    let bit = choice(&mut g, &[zero, one]);
    g.add_rule("BIT", bit);

    let char_ = g.add_node(Recognizer::range(0x01, 0x7F));
    g.add_rule("CHAR", char_);

    let cr = g.add_node(Recognizer::char(0x0D));
    g.add_rule("CR", cr);

    let cr_ref = g.rule_ref("CR");
    let lf_ref = g.rule_ref("LF");
    let crlf = g.add_node(Recognizer::Sequence(Box::new([cr_ref, lf_ref])));
    g.add_rule("CRLF", crlf);

    let controls = g.add_node(Recognizer::range(0x00, 0x1F));
    let del = g.add_node(Recognizer::char(0x7F));
    let ctl = choice(&mut g, &[controls, del]);
    g.add_rule("CTL", ctl);

    let digit = g.add_node(Recognizer::range(0x30, 0x39));
    g.add_rule("DIGIT", digit);

    let dquote = g.add_node(Recognizer::char(0x22));
    g.add_rule("DQUOTE", dquote);

    let mut hex = vec![g.rule_ref("DIGIT")];
    for letter in ["A", "B", "C", "D", "E", "F"] {
        hex.push(g.add_node(Recognizer::literal(letter, true)));
    }
    let hexdig = choice(&mut g, &hex);
    g.add_rule("HEXDIG", hexdig);

    let htab = g.add_node(Recognizer::char(0x09));
    g.add_rule("HTAB", htab);

    let lf = g.add_node(Recognizer::char(0x0A));
    g.add_rule("LF", lf);

    // LWSP = *(WSP / CRLF WSP)
    let wsp_ref = g.rule_ref("WSP");
    let crlf_ref = g.rule_ref("CRLF");
    let wsp_after = g.rule_ref("WSP");
    let folded = g.add_node(Recognizer::Sequence(Box::new([crlf_ref, wsp_after])));
    let unit = choice(&mut g, &[wsp_ref, folded]);
    let group = g.add_node(Recognizer::Fold(unit));
    let lwsp = g.add_node(Recognizer::Repetition {
        child: group,
        min: 0,
        max: None,
    });
    g.add_rule("LWSP", lwsp);

    let octet = g.add_node(Recognizer::range(0x00, 0xFF));
    g.add_rule("OCTET", octet);

    let sp = g.add_node(Recognizer::char(0x20));
    g.add_rule("SP", sp);

    let vchar = g.add_node(Recognizer::range(0x21, 0x7E));
    g.add_rule("VCHAR", vchar);

    let sp_ref = g.rule_ref("SP");
    let htab_ref = g.rule_ref("HTAB");
    let wsp = choice(&mut g, &[sp_ref, htab_ref]);
    g.add_rule("WSP", wsp);

    g.optimize();
    g
}

fn choice(g: &mut Grammar, alternatives: &[NodeId]) -> NodeId {
    g.add_node(Recognizer::Choice(alternatives.into()))
}
