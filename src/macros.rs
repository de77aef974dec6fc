//! Scanner helper macros.

/// Builds a [`Token`](crate::lexer::tokens::Token) of `$kind` with text
/// `$value` on source line `$line`.
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::IntLiteral, "42".to_string(), 1);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $line:expr) => {
        Token {
            kind: $kind,
            value: $value,
            line: $line,
        }
    };
}

/// Handler for a pattern that always matches the fixed text `$value`, such as
/// an operator or delimiter. Pushes one token on the lexer's current line and
/// skips over the text.
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let line = lexer.line;
            lexer.push(MK_TOKEN!($kind, String::from($value), line));
            lexer.advance_n($value.len());
        }
    };
}
