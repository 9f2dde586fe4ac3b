//! End-to-end checks against a SIP grammar.

use std::time::{Duration, Instant};

use rekog_lib::{
    Compiler, DebugElement, DebugParser, Grammar, GrammarFile, GrammarLoader, Parser, core_rules,
};

const SIP_ABNF: &str = include_str!("fixtures/sip.abnf");
const REGISTER: &str = include_str!("fixtures/register.txt");
const RESPONSE: &str = include_str!("fixtures/response.txt");

fn compile_sip() -> Grammar {
    let core = core_rules();
    match Compiler::new(SIP_ABNF).name("sip").base(&core).compile() {
        Ok(compilation) => compilation.grammar,
        Err(err) => match err.diagnostics() {
            Some(diagnostics) => panic!("{}", diagnostics.render(SIP_ABNF)),
            None => panic!("{err}"),
        },
    }
}

/// Parses a whole message, observing only the root.
fn parse_message(grammar: &Grammar, message: &str) -> DebugElement {
    let parser = DebugParser::with_observed(grammar, &["sip-message"]);
    let (element, span) = parser
        .parse_input("sip-message", message)
        .expect("message should match");
    assert_eq!(span.len, message.len(), "message only partially consumed");
    element
}

/// Rule names and values, depth-first.
fn flatten(element: &DebugElement) -> Vec<(String, String)> {
    let mut out = vec![(element.rule().to_owned(), element.value().to_owned())];
    for child in element.children() {
        out.extend(flatten(child));
    }
    out
}

#[derive(Debug, Default)]
struct Uri {
    user: String,
    host: String,
    port: i64,
    params: Vec<Param>,
}

#[derive(Debug, Default)]
struct Param {
    name: String,
    value: String,
}

#[derive(Debug, Default)]
enum Value {
    #[default]
    Empty,
    Uri(Uri),
    Param(Param),
}

#[test]
fn sip_grammar_compiles_complete() {
    let grammar = compile_sip();
    assert!(grammar.is_complete());
    assert!(grammar.find_rule("sip-message").is_some());
    assert!(grammar.find_rule("SIP-URI").is_some());
}

#[test]
fn register_request_is_fully_consumed() {
    let grammar = compile_sip();
    let element = parse_message(&grammar, REGISTER);
    assert_eq!(element.rule(), "sip-message");
    assert_eq!(element.value(), REGISTER);
    assert!(element.children().is_empty());
}

#[test]
fn sip_uri_binding() {
    let grammar = compile_sip();
    let mut parser = Parser::new(&grammar);
    parser
        .set_handler("SIP-URI", || Value::Uri(Uri::default()))
        .set_collector("user", |value, text| {
            if let Value::Uri(uri) = value {
                uri.user = text.to_owned();
            }
        })
        .set_collector("host", |value, text| {
            if let Value::Uri(uri) = value {
                uri.host = text.to_owned();
            }
        })
        .set_int_collector("port", |value, port| {
            if let Value::Uri(uri) = value {
                uri.port = port;
            }
        })
        .set_child_collector("other-param", |value, child| {
            if let (Value::Uri(uri), Value::Param(param)) = (value, child) {
                uri.params.push(param);
            }
        });
    parser
        .set_handler("other-param", || Value::Param(Param::default()))
        .set_collector("pname", |value, text| {
            if let Value::Param(param) = value {
                param.name = text.to_owned();
            }
        })
        .set_collector("pvalue", |value, text| {
            if let Value::Param(param) = value {
                param.value = text.to_owned();
            }
        });

    let input = "sip:alice@example.com:5060;transport=tcp";
    let parsed = parser.parse_input("SIP-URI", input).unwrap();
    assert_eq!(parsed.span.len, input.len());

    let uri = match parsed.value {
        Some(Value::Uri(uri)) => uri,
        other => panic!("expected a uri, got {other:?}"),
    };
    assert_eq!(uri.user, "alice");
    assert_eq!(uri.host, "example.com");
    assert_eq!(uri.port, 5060);
    assert_eq!(uri.params.len(), 1);
    assert_eq!(uri.params[0].name, "transport");
    assert_eq!(uri.params[0].value, "tcp");
}

#[test]
fn headers_bind_inside_a_request() {
    #[derive(Debug, Default)]
    struct Register {
        methods: Vec<String>,
        call_id: String,
        expires: i64,
        sent_by: Vec<String>,
    }

    let grammar = compile_sip();
    let mut parser = Parser::new(&grammar);
    parser
        .set_handler("Request", Register::default)
        .set_collector("Method", |r, text| r.methods.push(text.to_owned()))
        .set_collector("callid", |r, text| r.call_id = text.to_owned())
        .set_int_collector("delta-seconds", |r, seconds| r.expires = seconds)
        .set_collector("sent-by", |r, text| r.sent_by.push(text.to_owned()));

    let parsed = parser.parse_input("sip-message", REGISTER).unwrap();
    assert_eq!(parsed.span.len, REGISTER.len());

    // The root has no handler of its own.
    assert!(parsed.value.is_none());

    let parsed = parser.parse_input("Request", REGISTER).unwrap();
    let register = parsed.value.unwrap();
    // Once on the request line, once in CSeq.
    assert_eq!(register.methods, ["REGISTER", "REGISTER"]);
    assert_eq!(register.call_id, "843817637684230@998sdasdh09");
    assert_eq!(register.expires, 7200);
    assert_eq!(register.sent_by, ["bobspc.biloxi.com:5060"]);
}

#[test]
fn header_name_alias_is_observable() {
    let grammar = compile_sip();
    let parser = DebugParser::with_observed(&grammar, &["sip-message", "header-name"]);

    let (element, span) = parser.parse_input("sip-message", RESPONSE).unwrap();
    assert_eq!(span.len, RESPONSE.len());
    assert_eq!(element.value(), RESPONSE);

    let names = element.find_children("header-name");
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].value(), "Custom-header");
}

#[test]
fn header_name_alias_reaches_collectors() {
    let grammar = compile_sip();
    let mut parser = Parser::new(&grammar);
    parser
        .set_handler("Response", Vec::<String>::new)
        .set_collector("header-name", |names, text| names.push(text.to_owned()));

    let parsed = parser.parse_input("Response", RESPONSE).unwrap();
    assert_eq!(parsed.value.unwrap(), ["Custom-header"]);
}

#[test]
fn saved_grammar_builds_identical_trees() {
    let compiled = compile_sip();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sip.grammar");
    compiled.save(&path).unwrap();
    let loaded = Grammar::load(&path).unwrap();

    for message in [REGISTER, RESPONSE] {
        let before = DebugParser::new(&compiled)
            .parse_input("sip-message", message)
            .unwrap();
        let after = DebugParser::new(&loaded)
            .parse_input("sip-message", message)
            .unwrap();
        assert_eq!(before.1, after.1);
        assert_eq!(flatten(&before.0), flatten(&after.0));
    }
}

#[test]
fn loading_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sip.grammar");
    compile_sip().save(&path).unwrap();

    let first = Grammar::load(&path).unwrap();
    let second = Grammar::load(&path).unwrap();
    assert_eq!(first.render(), second.render());

    let parse = |g: &Grammar| {
        let (element, _) = DebugParser::new(g).parse_input("sip-message", RESPONSE).unwrap();
        flatten(&element)
    };
    assert_eq!(parse(&first), parse(&second));
}

#[test]
fn loader_serves_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sip.abnf"), SIP_ABNF).unwrap();
    compile_sip().save(dir.path().join("sip.grammar")).unwrap();

    let mut loader = GrammarLoader::new();
    loader.add_path(dir.path());
    for name in ["sip.abnf", "sip.grammar"] {
        let grammar = loader.load(name).unwrap();
        assert_eq!(grammar.name(), "sip");
        parse_message(&grammar, REGISTER);
    }
}

fn best_of(runs: usize, mut f: impl FnMut()) -> Duration {
    (0..runs)
        .map(|_| {
            let started = Instant::now();
            f();
            started.elapsed()
        })
        .min()
        .unwrap_or_default()
}

#[test]
fn binary_load_beats_compilation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sip.grammar");
    compile_sip().save(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    let compile = best_of(5, || {
        std::hint::black_box(compile_sip());
    });
    let load = best_of(5, || {
        std::hint::black_box(rekog_bytecode::load_bytes(&bytes).unwrap());
    });

    assert!(compile > load * 2, "compile {compile:?} vs load {load:?}");
}
