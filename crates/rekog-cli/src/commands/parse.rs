use std::io::Read;
use std::path::PathBuf;

use rekog_lib::{DebugParser, PrintTracer};

use super::source::{fail, load_grammar};

pub enum Input {
    File(PathBuf),
    Text(String),
    Stdin,
}

pub struct ParseArgs {
    pub grammar_path: PathBuf,
    pub rule: String,
    pub input: Input,
    pub json: bool,
    pub observe: Vec<String>,
    pub trace: bool,
    pub full: bool,
    pub color: bool,
}

pub fn run(args: ParseArgs) {
    let loaded = load_grammar(&args.grammar_path, args.color).unwrap_or_else(|msg| fail(msg));
    let grammar = &loaded.grammar;

    // Unknown names are fatal inside the runtime; report them politely here.
    for name in std::iter::once(&args.rule).chain(&args.observe) {
        if grammar.find_rule(name).is_none_or(|id| grammar.rule_root(id).is_none()) {
            fail(format_args!("rule `{}` is not defined in `{}`", name, grammar.name()));
        }
    }

    let input = read_input(&args.input).unwrap_or_else(|msg| fail(msg));

    let parser = if args.observe.is_empty() {
        DebugParser::new(grammar)
    } else {
        DebugParser::with_observed(grammar, &args.observe)
    };

    let result = if args.trace {
        let mut tracer = PrintTracer::new(grammar);
        let result = parser.parse_input_with_tracer(&args.rule, &input, 0, &mut tracer);
        tracer.print();
        println!();
        result
    } else {
        parser.parse_input(&args.rule, &input)
    };

    let Some((element, span)) = result else {
        fail(format_args!("`{}` does not match the input", args.rule));
    };
    if args.full && span.len != input.len() {
        fail(format_args!(
            "`{}` matched only {} of {} bytes",
            args.rule,
            span.len,
            input.len()
        ));
    }

    if args.json {
        match serde_json::to_string_pretty(&element) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        }
    } else {
        print!("{}", element);
    }
}

fn read_input(input: &Input) -> Result<String, String> {
    match input {
        Input::Text(text) => Ok(text.clone()),
        Input::File(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e)),
        Input::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            Ok(text)
        }
    }
}
