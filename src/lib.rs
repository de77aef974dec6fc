#![allow(clippy::module_inception)]

use std::rc::Rc;

use inkwell::context::Context;

use crate::{
    compiler::compiler::{compile, Compiler},
    errors::errors::Error,
    grammar::{table::ParseTable, DEFAULT_GRAMMAR},
    lexer::{lexer::tokenize, tokens::TokenStream},
    parser::parser::parse,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A 1-based source line and the file it belongs to. Line 0 means the
/// position is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

/// Compiles `source` with the built-in grammar.
///
/// Lexical and syntax errors abort and are returned; semantic problems are
/// collected on the returned compiler.
pub fn compile_source<'ctx>(
    source: &str,
    file_name: &str,
    context: &'ctx Context,
) -> Result<Compiler<'ctx>, Error> {
    compile_with_grammar(source, DEFAULT_GRAMMAR, file_name, context)
}

/// Compiles `source` with tables built from `grammar`.
pub fn compile_with_grammar<'ctx>(
    source: &str,
    grammar: &str,
    file_name: &str,
    context: &'ctx Context,
) -> Result<Compiler<'ctx>, Error> {
    let file = Rc::new(file_name.to_string());

    let table = ParseTable::build(grammar)?;
    let tokens = tokenize(source, Some(file_name.to_string()))?;
    let ast = parse(&table, &mut TokenStream::new(tokens), Rc::clone(&file))?;

    compile(&ast, context, file_name, file)
}

/// The text of 1-based `line` in `source`, if it exists.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source.lines().nth(line as usize - 1)
}
