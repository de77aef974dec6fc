use std::{env, fs::read_to_string, path::Path, process, rc::Rc, time::Instant};

use inkwell::context::Context;
use slrc::{
    compiler::compiler::compile,
    errors::errors::{Error, ErrorTip},
    get_line,
    grammar::{table::ParseTable, DEFAULT_GRAMMAR},
    lexer::{lexer::tokenize, tokens::TokenStream},
    parser::parser::parse,
};

fn read_file(path: &str) -> String {
    match read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", path, error);
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: slrc <source> [grammar]");
        process::exit(1);
    }

    let file_path: &str = &args[1];
    let file_name = Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string());

    let source = read_file(file_path);
    let (grammar_name, grammar) = match args.get(2) {
        Some(path) => (path.clone(), read_file(path)),
        None => (String::from("<grammar>"), DEFAULT_GRAMMAR.to_string()),
    };

    let start = Instant::now();

    let table = match ParseTable::build(&grammar) {
        Ok(table) => table,
        Err(error) => {
            display_error(&error, &grammar, &grammar_name);
            process::exit(1);
        }
    };

    eprintln!(
        "Built {} parser states in {:?}",
        table.state_count(),
        start.elapsed()
    );

    let lex_start = Instant::now();
    let tokens = match tokenize(&source, Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &source, &file_name);
            process::exit(1);
        }
    };

    eprintln!("Tokenized in {:?}", lex_start.elapsed());

    let parse_start = Instant::now();
    let ast = match parse(
        &table,
        &mut TokenStream::new(tokens),
        Rc::new(file_name.clone()),
    ) {
        Ok(ast) => ast,
        Err(error) => {
            display_error(&error, &source, &file_name);
            process::exit(1);
        }
    };

    eprintln!("Parsed in {:?}", parse_start.elapsed());

    let context = Context::create();
    let compile_start = Instant::now();
    let compiler = match compile(&ast, &context, &file_name, Rc::new(file_name.clone())) {
        Ok(compiler) => compiler,
        Err(error) => {
            display_error(&error, &source, &file_name);
            process::exit(1);
        }
    };

    eprintln!("Compiled in {:?}", compile_start.elapsed());

    for diagnostic in compiler.diagnostics() {
        display_error(diagnostic, &source, &file_name);
    }

    if let Err(error) = compiler.verify() {
        display_error(&error, &source, &file_name);
        process::exit(1);
    }

    print!("{}", compiler.print_to_string());

    eprintln!("Total time: {:?}", start.elapsed());
}

fn display_error(error: &Error, source: &str, file: &str) {
    /*
        Error: message (tip)
        -> main.c
           |
        20 | int a = #;
           | ^^^^^^^^^
    */

    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file);

    let Some(line_text) = get_line(source, position.0) else {
        return;
    };

    let line_string = position.0.to_string();
    let padding = line_string.len() + 2;

    eprintln!("{:>padding$}", "|");

    let line_text = line_text.trim();
    eprintln!("{} | {}", line_string, line_text);

    let arrows = line_text.len().max(1);
    eprintln!("{:>padding$} {:^>arrows$}", "|", "^");
}
