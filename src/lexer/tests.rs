//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - Operators and punctuation, longest match first
//! - Comments and line counting
//! - The lookahead-1 token stream
//! - Error cases

use super::{
    lexer::tokenize,
    tokens::{TokenKind, TokenSource, TokenStream},
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, Some("test.c".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("int float void const return main if else"),
        vec![
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::Void,
            TokenKind::Const,
            TokenKind::Return,
            TokenKind::Main,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo bar_1 _x mainly", None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "bar_1");
    assert_eq!(tokens[2].value, "_x");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "mainly");
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 0 5. .25", None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::IntLiteral);
    assert_eq!(tokens[3].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[3].value, "5.");
    assert_eq!(tokens[4].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[4].value, ".25");
}

#[test]
fn test_tokenize_operators_longest_match() {
    assert_eq!(
        kinds("== = != ! <= < >= > && || + - * / %"),
        vec![
            TokenKind::Equals,
            TokenKind::Assignment,
            TokenKind::NotEquals,
            TokenKind::Not,
            TokenKind::LessEquals,
            TokenKind::Less,
            TokenKind::GreaterEquals,
            TokenKind::Greater,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_without_whitespace() {
    assert_eq!(
        kinds("a=b<=-1;"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Identifier,
            TokenKind::LessEquals,
            TokenKind::Dash,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments_and_lines() {
    let source = "int a; // trailing\n/* block\n comment */ int b;\n\nreturn";
    let tokens = tokenize(source, None).unwrap();

    assert_eq!(tokens.len(), 8);
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[3].kind, TokenKind::Int);
    assert_eq!(tokens[3].line, 3);
    assert_eq!(tokens[6].kind, TokenKind::Return);
    assert_eq!(tokens[6].line, 5);
}

#[test]
fn test_tokenize_unrecognised_character() {
    let error = tokenize("int a = 1;\nint b = @;", Some("test.c".to_string())).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 2);
}

#[test]
fn test_token_stream_peek_is_idempotent() {
    let mut stream = TokenStream::new(tokenize("a b", None).unwrap());

    assert_eq!(stream.peek().value, "a");
    assert_eq!(stream.peek().value, "a");
    assert_eq!(stream.next().value, "a");
    assert_eq!(stream.peek().value, "b");
    assert_eq!(stream.next().value, "b");
}

#[test]
fn test_token_stream_repeats_eof() {
    let mut stream = TokenStream::new(tokenize("x", None).unwrap());

    stream.next();
    assert_eq!(stream.next().kind, TokenKind::EOF);
    assert_eq!(stream.next().kind, TokenKind::EOF);
    assert_eq!(stream.peek().kind, TokenKind::EOF);
}
