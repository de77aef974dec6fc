//! Grammar table builder.
//!
//! This module turns a textual grammar into deterministic SLR(1) tables:
//!
//! - Loading rules, classifying symbols and augmenting with `S' -> Start`
//! - Epsilon-derivability, FIRST and FOLLOW fixpoints
//! - LR(0) closure, goto and the canonical collection of item sets
//! - Action (shift/reduce/accept/error) and goto tables with conflict resolution
//!
//! [`DEFAULT_GRAMMAR`] is the grammar of the source language accepted by the
//! parser and lowered by the compiler.

pub mod grammar;
pub mod lr0;
pub mod table;

/// Grammar of the source language, embedded at build time.
pub const DEFAULT_GRAMMAR: &str = include_str!("grammar.txt");
