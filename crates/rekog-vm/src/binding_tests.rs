use std::sync::{Arc, Mutex};

use indoc::indoc;
use rekog_core::Span;

use crate::Parser;
use crate::binding::leading_int;
use crate::test_utils::grammar;

#[derive(Debug, Default, Clone, PartialEq)]
struct Element {
    user: String,
    host: String,
    port: i64,
    name: String,
    value: String,
    params: Vec<Element>,
}

const SIP_URI: &str = indoc! {r#"
    sip-uri = "sip:" [ user "@" ] host [ ":" port ] *( ";" other-param )
    user = 1*( ALPHA / DIGIT / "." / "-" )
    host = 1*( ALPHA / DIGIT / "." / "-" )
    port = 1*DIGIT
    other-param = pname [ "=" pvalue ]
    pname = 1*( ALPHA / DIGIT / "-" )
    pvalue = 1*( ALPHA / DIGIT / "-" )
"#};

fn uri_parser(g: &rekog_core::Grammar) -> Parser<'_, Element> {
    let mut parser = Parser::new(g);
    parser
        .set_handler("sip-uri", Element::default)
        .set_collector("user", |uri, text| uri.user = text.to_owned())
        .set_collector("host", |uri, text| uri.host = text.to_owned())
        .set_int_collector("port", |uri, port| uri.port = port)
        .set_child_collector("other-param", |uri, param| uri.params.push(param));
    parser
        .set_handler("other-param", Element::default)
        .set_collector("pname", |param, text| param.name = text.to_owned())
        .set_collector("pvalue", |param, text| param.value = text.to_owned());
    parser
}

#[test]
fn unbound_root_reports_span_only() {
    let g = grammar("digit = %x30-39\nnum = 1*digit\n");
    let parser: Parser<'_, ()> = Parser::new(&g);

    let parsed = parser.parse_input("num", "12a").unwrap();
    assert_eq!(parsed.value, None);
    assert_eq!(parsed.span, Span::new(0, 2));
    assert_eq!(parsed.span.text(b"12a"), "12");
}

#[test]
fn text_handler_on_root() {
    let g = grammar(r#"greeting = "hello" / "hi""#);
    let mut parser = Parser::new(&g);
    parser.set_text_handler("greeting", |rule, text| format!("{rule}:{text}"));

    let parsed = parser.parse_input("greeting", "hi there").unwrap();
    assert_eq!(parsed.value.as_deref(), Some("greeting:hi"));
    assert_eq!(parsed.span.len, 2);
}

#[test]
fn sip_uri_fields() {
    let g = grammar(SIP_URI);
    let parser = uri_parser(&g);

    let input = "sip:alice@example.com:5060;transport=tcp";
    let parsed = parser.parse_input("sip-uri", input).unwrap();
    assert_eq!(parsed.span.len, input.len());

    let uri = parsed.value.unwrap();
    assert_eq!(uri.user, "alice");
    assert_eq!(uri.host, "example.com");
    assert_eq!(uri.port, 5060);
    assert_eq!(uri.params.len(), 1);
    assert_eq!(uri.params[0].name, "transport");
    assert_eq!(uri.params[0].value, "tcp");
}

#[test]
fn repeated_children_in_document_order() {
    let g = grammar(SIP_URI);
    let parser = uri_parser(&g);

    let uri = parser
        .parse_input("sip-uri", "sip:host;lr;ttl=5;maddr=x")
        .and_then(|parsed| parsed.value)
        .unwrap();

    let params: Vec<_> = uri
        .params
        .iter()
        .map(|p| (p.name.as_str(), p.value.as_str()))
        .collect();
    assert_eq!(params, [("lr", ""), ("ttl", "5"), ("maddr", "x")]);
}

#[test]
fn rolled_back_matches_are_not_delivered() {
    let g = grammar(SIP_URI);
    let parser = uri_parser(&g);

    // `user "@"` fails after `user` matched "example.com"
    let uri = parser
        .parse_input("sip-uri", "sip:example.com")
        .and_then(|parsed| parsed.value)
        .unwrap();
    assert_eq!(uri.user, "");
    assert_eq!(uri.host, "example.com");
}

#[test]
fn deliveries_pass_through_unhandled_rules() {
    let g = grammar(indoc! {r#"
        list = item *( "," item )
        item = word
        word = 1*ALPHA
    "#});
    let mut parser = Parser::new(&g);
    parser
        .set_handler("list", Vec::<String>::new)
        .set_collector("item", |log, text| log.push(format!("item {text}")))
        .set_collector("word", |log, text| log.push(format!("word {text}")));

    let log = parser.parse_input("list", "ab,cd").unwrap().value.unwrap();
    assert_eq!(log, ["item ab", "word ab", "item cd", "word cd"]);
}

#[test]
fn any_child_collector() {
    let g = grammar(indoc! {r#"
        pair = key "=" val
        key = 1*ALPHA
        val = 1*DIGIT
    "#});
    let mut parser = Parser::new(&g);
    parser
        .set_text_handler("pair", |_, _| String::new())
        .set_any_child_collector(|pair, child| {
            pair.push('[');
            pair.push_str(&child);
            pair.push(']');
        });
    parser.set_text_handler("key", |rule, text| format!("{rule}:{text}"));
    parser.set_text_handler("val", |rule, text| format!("{rule}:{text}"));

    let pair = parser.parse_input("pair", "ab=12").unwrap().value.unwrap();
    assert_eq!(pair, "[key:ab][val:12]");
}

#[test]
fn specific_collector_wins_over_any_child() {
    let g = grammar(indoc! {r#"
        pair = key "=" val
        key = 1*ALPHA
        val = 1*DIGIT
    "#});
    let mut parser = Parser::new(&g);
    parser
        .set_text_handler("pair", |_, _| String::new())
        .set_child_collector("key", |pair, key| pair.push_str(&format!("<{key}>")))
        .set_any_child_collector(|pair, child| pair.push_str(&child));
    parser.set_text_handler("key", |_, text| text.to_owned());
    parser.set_text_handler("val", |_, text| text.to_owned());

    let pair = parser.parse_input("pair", "ab=12").unwrap().value.unwrap();
    assert_eq!(pair, "<ab>12");
}

#[test]
fn child_collector_ignores_unhandled_child() {
    let g = grammar("pair = key \"=\" key\nkey = 1*ALPHA\n");
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let mut parser = Parser::new(&g);
    parser
        .set_handler("pair", || 0u32)
        .set_child_collector("key", move |_, _| *counter.lock().unwrap() += 1);

    assert!(parser.parse_input("pair", "a=b").is_some());
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn handler_names_are_case_insensitive() {
    let g = grammar(SIP_URI);
    let mut parser = Parser::new(&g);
    parser
        .set_handler("SIP-URI", Element::default)
        .set_collector("Host", |uri, text| uri.host = text.to_owned());

    let uri = parser.parse_input("sip-Uri", "sip:h").unwrap().value.unwrap();
    assert_eq!(uri.host, "h");
}

#[test]
fn parse_at_offset() {
    let g = grammar("num = 1*DIGIT\n");
    let mut parser = Parser::new(&g);
    parser.set_text_handler("num", |_, text| text.to_owned());

    let parsed = parser.parse_input_at("num", "port=8080;", 5).unwrap();
    assert_eq!(parsed.value.as_deref(), Some("8080"));
    assert_eq!(parsed.span, Span::new(5, 4));
}

#[test]
fn no_match_is_none() {
    let g = grammar("word = 1*ALPHA\n");
    let mut parser = Parser::new(&g);
    parser.set_text_handler("word", |_, text| text.to_owned());

    assert!(parser.parse_input("word", "").is_none());
    assert!(parser.parse_input("word", "123").is_none());
}

#[test]
#[should_panic(expected = "unknown rule `nope`")]
fn unknown_root_is_fatal() {
    let g = grammar("word = 1*ALPHA\n");
    let parser: Parser<'_, ()> = Parser::new(&g);

    let _ = parser.parse_input("nope", "abc");
}

#[test]
#[should_panic(expected = "unknown rule `missing`")]
fn unknown_handler_rule_is_fatal() {
    let g = grammar("word = 1*ALPHA\n");
    let mut parser = Parser::new(&g);

    parser.set_handler("missing", || ());
}

#[test]
#[should_panic(expected = "unknown rule `missing`")]
fn unknown_collector_rule_is_fatal() {
    let g = grammar("word = 1*ALPHA\n");
    let mut parser = Parser::new(&g);

    parser
        .set_handler("word", String::new)
        .set_collector("missing", |_, _| {});
}

#[test]
fn shared_across_threads() {
    let g = grammar(SIP_URI);
    let parser = uri_parser(&g);

    std::thread::scope(|scope| {
        let handles: Vec<_> = ["sip:a@b", "sip:c@d"]
            .into_iter()
            .map(|input| {
                let parser = &parser;
                scope.spawn(move || parser.parse_input("sip-uri", input).unwrap().value.unwrap())
            })
            .collect();
        let users: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().user)
            .collect();
        assert_eq!(users, ["a", "c"]);
    });
}

#[test]
fn leading_int_like_atoi() {
    assert_eq!(leading_int("5060"), 5060);
    assert_eq!(leading_int("42abc"), 42);
    assert_eq!(leading_int(" +7"), 7);
    assert_eq!(leading_int("-12"), -12);
    assert_eq!(leading_int("abc"), 0);
    assert_eq!(leading_int(""), 0);
    assert_eq!(leading_int("99999999999999999999999"), i64::MAX);
}
