//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the shift-reduce parser that runs the SLR tables
//! from [`crate::grammar`] over a token stream. It handles:
//!
//! - Driving the automaton with explicit state and fragment stacks
//! - Building leaves for literals and identifiers on shift
//! - Running per-production construction rules on reduce
//! - Reporting the first unexpected token with its line
//!
//! Operator precedence and associativity come from the grammar itself, so
//! the parser has no binding power tables.

pub mod parser;
pub mod rules;

#[cfg(test)]
mod tests;
