//! Code generation module for the compiler.
//!
//! This module lowers the syntax tree into LLVM IR through inkwell. It handles:
//!
//! - Scope frames for globals, parameters, locals and nested blocks
//! - Implicit coercion between `int`, `float` and the `i1` condition kind
//! - Constant folding of global initializers
//! - Control flow for `if`/`else` and short-circuit `&&`/`||`
//! - Semantic diagnostics that substitute zero and let lowering continue

pub mod compiler;
pub mod expr;
pub mod fold;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
