//! Lexical analysis module for the compiler.
//!
//! This module contains the scanner that converts source code into the
//! token stream consumed by the table-driven parser. It handles:
//!
//! - Tokenization of source code using ordered regex patterns
//! - Recognition of keywords, identifiers, integer and float literals
//! - Line tracking for error reporting
//! - Comments and whitespace handling
//! - The lookahead-1 `TokenSource` interface the parser reads from

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
