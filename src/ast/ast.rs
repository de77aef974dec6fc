use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

/// Declared type of a variable, parameter or function result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    Void,
}

impl TypeName {
    pub fn from_token(kind: TokenKind) -> Option<TypeName> {
        match kind {
            TokenKind::Int => Some(TypeName::Int),
            TokenKind::Float => Some(TypeName::Float),
            TokenKind::Void => Some(TypeName::Void),
            _ => None,
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeName::Int => write!(f, "int"),
            TypeName::Float => write!(f, "float"),
            TypeName::Void => write!(f, "void"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Int(i32),
    Float(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Assign,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Dash => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            TokenKind::Less => Some(BinaryOp::Lt),
            TokenKind::Greater => Some(BinaryOp::Gt),
            TokenKind::LessEquals => Some(BinaryOp::Le),
            TokenKind::GreaterEquals => Some(BinaryOp::Ge),
            TokenKind::Equals => Some(BinaryOp::Eq),
            TokenKind::NotEquals => Some(BinaryOp::Ne),
            TokenKind::And => Some(BinaryOp::And),
            TokenKind::Or => Some(BinaryOp::Or),
            TokenKind::Assignment => Some(BinaryOp::Assign),
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Assign => "=",
        };
        write!(f, "{}", symbol)
    }
}

/// An identifier together with the line it was written on.
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub value: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeName,
    pub name: Name,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub return_type: TypeName,
    pub name: Name,
    pub params: Vec<Param>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeName,
    pub name: Name,
    pub init: Option<Box<Node>>,
    pub constant: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Box<Node>,
    pub then_branch: Box<Node>,
    pub else_branch: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Name,
    pub args: Vec<Node>,
}

/// A node of the syntax tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    CompUnit(Vec<Node>),
    FuncDef(FuncDef),
    Block(Vec<Node>),
    VarDecl(VarDecl),
    If(IfStmt),
    Return(Option<Box<Node>>),
    Binary(BinaryExpr),
    Call(CallExpr),
    Number(NumberValue),
    Ident(Name),
}

impl Node {
    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
        Node::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::CompUnit(_) => "CompUnit",
            Node::FuncDef(_) => "FuncDef",
            Node::Block(_) => "Block",
            Node::VarDecl(_) => "VarDecl",
            Node::If(_) => "If",
            Node::Return(_) => "Return",
            Node::Binary(_) => "Binary",
            Node::Call(_) => "Call",
            Node::Number(_) => "Number",
            Node::Ident(_) => "Ident",
        }
    }
}
