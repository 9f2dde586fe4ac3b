use std::path::PathBuf;

use super::source::{fail, load_grammar};

pub struct DumpArgs {
    pub grammar_path: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let loaded = load_grammar(&args.grammar_path, args.color).unwrap_or_else(|msg| fail(msg));
    let grammar = &loaded.grammar;

    if let Some(header) = &loaded.header {
        println!("; grammar `{}`", grammar.name());
        println!("; version {}", header.version);
        println!("; size {} bytes, checksum {:08x}", header.total_size, header.checksum);
        println!(
            "; {} rules, {} nodes, {} strings",
            header.rule_count, header.node_count, header.str_count
        );
        println!();
    }
    print!("{}", grammar.render());

    let undefined: Vec<_> = grammar.undefined_rules().collect();
    if !undefined.is_empty() {
        println!();
        println!("; undefined: {}", undefined.join(", "));
    }
}
