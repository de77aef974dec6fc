/// AST (Abstract Syntax Tree) module
/// Contains the closed set of syntax tree nodes built by the parser's
/// reductions and consumed once by the compiler.
///
/// Submodules:
/// - ast: Node, declaration, statement and expression definitions
pub mod ast;
