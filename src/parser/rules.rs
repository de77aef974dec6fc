//! Per-production construction rules.
//!
//! Every reduction hands the popped fragments of a production to
//! [`build_fragment`], which picks a rule by the production's left-hand side
//! and arity. Unknown shapes fall back to pass-through for unit productions
//! and to an empty fragment for ε-productions.

use crate::{
    ast::ast::{
        BinaryOp, CallExpr, FuncDef, IfStmt, Name, Node, NumberValue, Param, TypeName, VarDecl,
    },
    errors::errors::{Error, ErrorImpl},
    grammar::{grammar::Production, table::ParseTable},
    lexer::tokens::TokenKind,
    Position,
};

/// A partially built piece of the tree sitting on the parser's node stack.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fragment {
    /// Structural tokens and empty productions.
    #[default]
    Empty,
    Node(Node),
    Type(TypeName),
    Items(Vec<Node>),
    /// Declarators of one declaration, waiting for their type.
    Defs(Vec<(Name, Option<Node>)>),
    Params(Vec<Param>),
    Param(Param),
    Args(Vec<Node>),
}

impl Fragment {
    fn into_node(self, position: &Position) -> Result<Node, Error> {
        match self {
            Fragment::Node(node) => Ok(node),
            _ => Err(Error::new(ErrorImpl::InvalidParseStack, position.clone())),
        }
    }

    fn into_name(self, position: &Position) -> Result<Name, Error> {
        match self {
            Fragment::Node(Node::Ident(name)) => Ok(name),
            _ => Err(Error::new(ErrorImpl::InvalidParseStack, position.clone())),
        }
    }

    fn into_nodes(self) -> Vec<Node> {
        match self {
            Fragment::Node(node) => vec![node],
            Fragment::Items(items) | Fragment::Args(items) => items,
            _ => vec![],
        }
    }

    fn into_params(self) -> Vec<Param> {
        match self {
            Fragment::Params(params) => params,
            Fragment::Param(param) => vec![param],
            _ => vec![],
        }
    }

    fn into_defs(self) -> Vec<(Name, Option<Node>)> {
        match self {
            Fragment::Defs(defs) => defs,
            _ => vec![],
        }
    }

    /// A statement in a position that needs one; `;` becomes an empty block.
    fn into_statement(self, position: &Position) -> Result<Node, Error> {
        match self {
            Fragment::Empty => Ok(Node::Block(vec![])),
            fragment => fragment.into_node(position),
        }
    }
}

fn take(children: &mut [Fragment], index: usize) -> Fragment {
    children.get_mut(index).map(std::mem::take).unwrap_or_default()
}

fn symbol_kind(table: &ParseTable, production: &Production, index: usize) -> Option<TokenKind> {
    production
        .rhs
        .get(index)
        .and_then(|symbol| table.grammar().terminal_kind(symbol))
}

fn declarations(ty: TypeName, defs: Vec<(Name, Option<Node>)>, constant: bool) -> Fragment {
    Fragment::Items(
        defs.into_iter()
            .map(|(name, init)| {
                Node::VarDecl(VarDecl {
                    ty,
                    name,
                    init: init.map(Box::new),
                    constant,
                })
            })
            .collect(),
    )
}

/// Builds the fragment for a reduction by `production` over `children`.
pub fn build_fragment(
    table: &ParseTable,
    production: &Production,
    mut children: Vec<Fragment>,
    position: &Position,
) -> Result<Fragment, Error> {
    let arity = production.rhs.len();
    let children = children.as_mut_slice();

    let fragment = match (production.lhs.as_str(), arity) {
        ("Program", 1) => Fragment::Node(Node::CompUnit(take(children, 0).into_nodes())),
        ("compUnit", 1) | ("blockItems", 1) => Fragment::Items(take(children, 0).into_nodes()),
        ("compUnit", 2) | ("blockItems", 2) => {
            let mut items = take(children, 0).into_nodes();
            items.extend(take(children, 1).into_nodes());
            Fragment::Items(items)
        }
        ("blockItems", 0) => Fragment::Items(vec![]),

        ("varDecl", 3) => match take(children, 0) {
            Fragment::Type(ty) => declarations(ty, take(children, 1).into_defs(), false),
            _ => return Err(Error::new(ErrorImpl::InvalidParseStack, position.clone())),
        },
        ("constDecl", 4) => match take(children, 1) {
            Fragment::Type(ty) => declarations(ty, take(children, 2).into_defs(), true),
            _ => return Err(Error::new(ErrorImpl::InvalidParseStack, position.clone())),
        },
        ("btype", 1) => match symbol_kind(table, production, 0).and_then(TypeName::from_token) {
            Some(ty) => Fragment::Type(ty),
            None => return Err(unsupported(production, position)),
        },
        ("varDefList", 1) => take(children, 0),
        ("varDefList", 3) => {
            let mut defs = take(children, 0).into_defs();
            defs.extend(take(children, 2).into_defs());
            Fragment::Defs(defs)
        }
        ("varDef", 1) => Fragment::Defs(vec![(take(children, 0).into_name(position)?, None)]),
        ("varDef", 3) => {
            let name = take(children, 0).into_name(position)?;
            let init = take(children, 2).into_node(position)?;
            Fragment::Defs(vec![(name, Some(init))])
        }

        ("funcDef", 6) => {
            let return_type = match take(children, 0) {
                Fragment::Type(ty) => ty,
                _ => symbol_kind(table, production, 0)
                    .and_then(TypeName::from_token)
                    .ok_or_else(|| unsupported(production, position))?,
            };
            let name = take(children, 1).into_name(position)?;
            let params = take(children, 3).into_params();
            let body = match take(children, 5).into_node(position)? {
                Node::Block(body) => body,
                other => vec![other],
            };

            Fragment::Node(Node::FuncDef(FuncDef {
                return_type,
                name,
                params,
                body,
            }))
        }
        ("funcFParamsOpt", 0) => Fragment::Params(vec![]),
        ("funcFParams", 1) => Fragment::Params(take(children, 0).into_params()),
        ("funcFParams", 3) => {
            let mut params = take(children, 0).into_params();
            params.extend(take(children, 2).into_params());
            Fragment::Params(params)
        }
        ("funcFParam", 2) => match take(children, 0) {
            Fragment::Type(ty) => Fragment::Param(Param {
                ty,
                name: take(children, 1).into_name(position)?,
            }),
            _ => return Err(Error::new(ErrorImpl::InvalidParseStack, position.clone())),
        },

        ("block", 3) => Fragment::Node(Node::Block(take(children, 1).into_nodes())),

        ("stmt", 4) => {
            let target = take(children, 0).into_node(position)?;
            let value = take(children, 2).into_node(position)?;
            Fragment::Node(Node::binary(BinaryOp::Assign, target, value))
        }
        ("stmt", 2) if symbol_kind(table, production, 0) == Some(TokenKind::Return) => {
            Fragment::Node(Node::Return(None))
        }
        ("stmt", 2) => take(children, 0),
        ("stmt", 3) if symbol_kind(table, production, 0) == Some(TokenKind::Return) => {
            let value = take(children, 1).into_node(position)?;
            Fragment::Node(Node::Return(Some(Box::new(value))))
        }
        ("stmt", 5) => Fragment::Node(Node::If(IfStmt {
            condition: Box::new(take(children, 2).into_node(position)?),
            then_branch: Box::new(take(children, 4).into_statement(position)?),
            else_branch: None,
        })),
        ("stmt", 7) => Fragment::Node(Node::If(IfStmt {
            condition: Box::new(take(children, 2).into_node(position)?),
            then_branch: Box::new(take(children, 4).into_statement(position)?),
            else_branch: Some(Box::new(take(children, 6).into_statement(position)?)),
        })),

        ("primaryExp", 3) => take(children, 1),
        ("unaryExp", 2) => {
            let operand = take(children, 1).into_node(position)?;
            match symbol_kind(table, production, 0) {
                Some(TokenKind::Plus) => Fragment::Node(operand),
                Some(TokenKind::Dash) => Fragment::Node(Node::binary(
                    BinaryOp::Sub,
                    Node::Number(NumberValue::Int(0)),
                    operand,
                )),
                Some(TokenKind::Not) => Fragment::Node(Node::binary(
                    BinaryOp::Eq,
                    operand,
                    Node::Number(NumberValue::Int(0)),
                )),
                _ => return Err(unsupported(production, position)),
            }
        }
        ("unaryExp", 4) => Fragment::Node(Node::Call(CallExpr {
            callee: take(children, 0).into_name(position)?,
            args: take(children, 2).into_nodes(),
        })),
        ("funcRParamsOpt", 0) => Fragment::Args(vec![]),
        ("funcRParams", 1) => Fragment::Args(take(children, 0).into_nodes()),
        ("funcRParams", 3) => {
            let mut args = take(children, 0).into_nodes();
            args.push(take(children, 2).into_node(position)?);
            Fragment::Args(args)
        }

        // lOrExp, lAndExp, eqExp, relExp, addExp and mulExp
        (_, 3) => match symbol_kind(table, production, 1).and_then(BinaryOp::from_token) {
            Some(op) if op != BinaryOp::Assign => {
                let left = take(children, 0).into_node(position)?;
                let right = take(children, 2).into_node(position)?;
                Fragment::Node(Node::binary(op, left, right))
            }
            _ => return Err(unsupported(production, position)),
        },
        (_, 1) => take(children, 0),
        (_, 0) => Fragment::Empty,
        _ => return Err(unsupported(production, position)),
    };

    Ok(fragment)
}

fn unsupported(production: &Production, position: &Position) -> Error {
    Error::new(
        ErrorImpl::UnsupportedProduction {
            production: production.to_string(),
        },
        position.clone(),
    )
}
