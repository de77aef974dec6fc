use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("void", TokenKind::Void);
        map.insert("const", TokenKind::Const);
        map.insert("return", TokenKind::Return);
        map.insert("main", TokenKind::Main);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map
    };

    /// Terminal names usable in grammar text, mapped to the token kind they match.
    pub static ref TERMINAL_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("KW_INT", TokenKind::Int);
        map.insert("KW_FLOAT", TokenKind::Float);
        map.insert("KW_VOID", TokenKind::Void);
        map.insert("KW_CONST", TokenKind::Const);
        map.insert("KW_RETURN", TokenKind::Return);
        map.insert("KW_MAIN", TokenKind::Main);
        map.insert("KW_IF", TokenKind::If);
        map.insert("KW_ELSE", TokenKind::Else);
        map.insert("ID", TokenKind::Identifier);
        map.insert("INT_CONST", TokenKind::IntLiteral);
        map.insert("FLOAT_CONST", TokenKind::FloatLiteral);
        map.insert("OP_PLUS", TokenKind::Plus);
        map.insert("OP_MINUS", TokenKind::Dash);
        map.insert("OP_MUL", TokenKind::Star);
        map.insert("OP_DIV", TokenKind::Slash);
        map.insert("OP_MOD", TokenKind::Percent);
        map.insert("OP_ASSIGN", TokenKind::Assignment);
        map.insert("OP_NOT", TokenKind::Not);
        map.insert("OP_EQ", TokenKind::Equals);
        map.insert("OP_NEQ", TokenKind::NotEquals);
        map.insert("OP_LT", TokenKind::Less);
        map.insert("OP_GT", TokenKind::Greater);
        map.insert("OP_LE", TokenKind::LessEquals);
        map.insert("OP_GE", TokenKind::GreaterEquals);
        map.insert("OP_AND", TokenKind::And);
        map.insert("OP_OR", TokenKind::Or);
        map.insert("SE_LPAREN", TokenKind::OpenParen);
        map.insert("SE_RPAREN", TokenKind::CloseParen);
        map.insert("SE_LBRACE", TokenKind::OpenCurly);
        map.insert("SE_RBRACE", TokenKind::CloseCurly);
        map.insert("SE_SEMICOLON", TokenKind::Semicolon);
        map.insert("SE_COMMA", TokenKind::Comma);
        map.insert("END_OFF", TokenKind::EOF);
        map
    };
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,
    IntLiteral,
    FloatLiteral,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Semicolon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Int,
    Float,
    Void,
    Const,
    Return,
    Main,
    If,
    Else,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// 1-based source line.
    pub line: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier | TokenKind::IntLiteral | TokenKind::FloatLiteral => {
                write!(f, "{} ({})", self.kind, self.value)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// A lookahead-1 stream of tokens.
///
/// `peek` never advances. `next` consumes the peeked token. Once the end of
/// input is reached both keep returning an `EOF` token.
pub trait TokenSource {
    fn peek(&mut self) -> &Token;
    fn next(&mut self) -> Token;
}

/// [`TokenSource`] over an already scanned token vector.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let last_line = tokens.last().map(|token| token.line).unwrap_or(1);

        TokenStream {
            tokens,
            pos: 0,
            eof: Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                line: last_line,
            },
        }
    }
}

impl TokenSource for TokenStream {
    fn peek(&mut self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn next(&mut self) -> Token {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                token.clone()
            }
            None => self.eof.clone(),
        }
    }
}
