//! Table-driven shift-reduce parser.
//!
//! The parser keeps an explicit stack of automaton states and a parallel
//! stack of tree fragments. Shifting a token pushes its leaf (literals and
//! identifiers) or an empty fragment (everything else). Reducing pops one
//! entry per right-hand symbol from both stacks, hands the fragments to the
//! production's construction rule and pushes the result with the goto state.
//!
//! The first `Error` action ends the parse; there is no recovery.

use std::rc::Rc;

use crate::{
    ast::ast::{Name, Node, NumberValue},
    errors::errors::{Error, ErrorImpl},
    grammar::table::{Action, ParseTable},
    lexer::tokens::{Token, TokenKind, TokenSource},
    Position,
};

use super::rules::{build_fragment, Fragment};

/// The state of one parse over a token stream.
///
/// A parser borrows its tables, so one [`ParseTable`] can serve any number
/// of parses.
pub struct Parser<'t> {
    /// Action and goto tables driving the automaton
    table: &'t ParseTable,
    /// Automaton states, starting with state 0
    state_stack: Vec<usize>,
    /// Fragments built so far, one per state above the bottom
    node_stack: Vec<Fragment>,
    /// The name of the source file being parsed
    file: Rc<String>,
}

impl<'t> Parser<'t> {
    /// Creates a parser positioned at state 0.
    pub fn new(table: &'t ParseTable, file: Rc<String>) -> Self {
        Parser {
            table,
            state_stack: vec![0],
            node_stack: vec![],
            file,
        }
    }

    fn position(&self, line: u32) -> Position {
        Position(line, Rc::clone(&self.file))
    }

    fn top(&self, line: u32) -> Result<usize, Error> {
        self.state_stack
            .last()
            .copied()
            .ok_or_else(|| Error::new(ErrorImpl::InvalidParseStack, self.position(line)))
    }

    /// Looks up the action for `kind`. The entry keyword doubles as an
    /// ordinary identifier, so `main` is retried as `Identifier` when the
    /// table has nothing for it.
    ///
    /// # Returns
    ///
    /// The kind the token is treated as, and the action to take.
    fn lookup(&self, state: usize, kind: TokenKind) -> (TokenKind, Action) {
        let action = self.table.action(state, kind);

        if action == Action::Error && kind == TokenKind::Main {
            let retried = self.table.action(state, TokenKind::Identifier);
            if retried != Action::Error {
                return (TokenKind::Identifier, retried);
            }
        }

        (kind, action)
    }

    /// Converts a shifted token into its leaf fragment.
    fn leaf(&self, kind: TokenKind, token: &Token) -> Result<Fragment, Error> {
        let number_error = || {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                },
                self.position(token.line),
            )
        };

        Ok(match kind {
            TokenKind::IntLiteral => Fragment::Node(Node::Number(NumberValue::Int(
                token.value.parse::<i32>().map_err(|_| number_error())?,
            ))),
            TokenKind::FloatLiteral => Fragment::Node(Node::Number(NumberValue::Float(
                token.value.parse::<f32>().map_err(|_| number_error())?,
            ))),
            TokenKind::Identifier => Fragment::Node(Node::Ident(Name {
                value: token.value.clone(),
                line: token.line,
            })),
            _ => Fragment::Empty,
        })
    }

    /// Pops the right-hand side of production `id`, builds its fragment and
    /// pushes it together with the goto state.
    fn reduce(&mut self, id: usize, line: u32) -> Result<(), Error> {
        let table = self.table;
        let production = table.production(id)?;
        let arity = production.rhs.len();

        if self.state_stack.len() <= arity || self.node_stack.len() < arity {
            return Err(Error::new(ErrorImpl::InvalidParseStack, self.position(line)));
        }

        self.state_stack.truncate(self.state_stack.len() - arity);
        let children = self.node_stack.split_off(self.node_stack.len() - arity);

        let position = self.position(line);
        let fragment = build_fragment(table, production, children, &position)?;

        let state = self.top(line)?;
        let target = table.goto(state, &production.lhs).ok_or_else(|| {
            Error::new(
                ErrorImpl::MissingGoto {
                    state,
                    symbol: production.lhs.clone(),
                },
                position,
            )
        })?;

        log::trace!("{}#{} reduce by {}", state, production.lhs, production);

        self.state_stack.push(target);
        self.node_stack.push(fragment);
        Ok(())
    }

    /// Runs the automaton until it accepts or fails.
    ///
    /// # Returns
    ///
    /// The compilation unit on acceptance, or the first syntax error.
    pub fn parse<S: TokenSource>(mut self, source: &mut S) -> Result<Node, Error> {
        loop {
            let (line, token_kind) = {
                let token = source.peek();
                (token.line, token.kind)
            };
            let state = self.top(line)?;
            let (kind, action) = self.lookup(state, token_kind);

            match action {
                Action::Shift(target) => {
                    let token = source.next();
                    log::trace!("{}#{} shift {}", state, token, target);

                    let leaf = self.leaf(kind, &token)?;
                    self.state_stack.push(target);
                    self.node_stack.push(leaf);
                }
                Action::Reduce(id) => self.reduce(id, line)?,
                Action::Accept => {
                    log::trace!("{}#{} accept", state, token_kind);
                    return self.finish(line);
                }
                Action::Error => {
                    let token = source.peek();
                    return Err(Error::new(
                        ErrorImpl::UnexpectedToken {
                            token: token.value.clone(),
                        },
                        self.position(token.line),
                    ));
                }
            }
        }
    }

    fn finish(mut self, line: u32) -> Result<Node, Error> {
        if self.node_stack.len() != 1 {
            return Err(Error::new(ErrorImpl::InvalidParseStack, self.position(line)));
        }

        match self.node_stack.pop() {
            Some(Fragment::Node(node)) => Ok(node),
            Some(Fragment::Items(items)) => Ok(Node::CompUnit(items)),
            _ => Err(Error::new(ErrorImpl::InvalidParseStack, self.position(line))),
        }
    }
}

/// Parses the tokens of `source` with `table`.
///
/// # Arguments
///
/// * `table` - Tables built from the language grammar
/// * `source` - Lookahead-1 token stream
/// * `file` - Name of the source file, used in error positions
pub fn parse<S: TokenSource>(
    table: &ParseTable,
    source: &mut S,
    file: Rc<String>,
) -> Result<Node, Error> {
    Parser::new(table, file).parse(source)
}
