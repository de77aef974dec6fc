use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Tried in order, so two-character operators come before their prefixes
    // and floats before integers.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^//[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"(?s)^/\*.*?\*/").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^([0-9]+\.[0-9]*|\.[0-9]+)").unwrap(), handler: float_handler },
        RegexPattern { regex: Regex::new(r"^[0-9]+").unwrap(), handler: int_handler },
        RegexPattern { regex: Regex::new(r"^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new(r"^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new(r"^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new(r"^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new(r"^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        RegexPattern { regex: Regex::new(r"^\|\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        RegexPattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new(r"^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        RegexPattern { regex: Regex::new(r"^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new(r"^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new(r"^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
        RegexPattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new(r"^\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new(r"^\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new(r"^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new(r"^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    pub line: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: &str, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            tokens: vec![],
            source: source.to_string(),
            pos: 0,
            line: 1,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    lexer.line += matched.matches('\n').count() as u32;
    lexer.advance_n(matched.len());
}

fn int_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let line = lexer.line;
    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::IntLiteral, matched, line));
}

fn float_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let line = lexer.line;
    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::FloatLiteral, matched, line));
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let line = lexer.line;
    let kind = RESERVED_LOOKUP
        .get(matched.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(kind, matched, line));
}

/// Scans `source` into tokens, ending with a single `EOF` token.
pub fn tokenize(source: &str, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: lex.at().to_string(),
                    },
                    Position(lex.line, Rc::clone(&lex.file)),
                ))
            }
        }
    }

    let line = lex.line;
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), line));
    Ok(lex.tokens)
}
