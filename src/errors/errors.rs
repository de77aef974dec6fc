use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

/// The phase an error belongs to. Grammar, lexical, syntax and backend errors
/// abort their phase; semantic errors are collected as diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Grammar,
    Syntax,
    Semantic,
    Backend,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorCategory::Lexical,
            ErrorImpl::MalformedGrammarLine { .. }
            | ErrorImpl::UnresolvedSymbol { .. }
            | ErrorImpl::InvalidProduction { .. }
            | ErrorImpl::EmptyGrammar => ErrorCategory::Grammar,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::MissingGoto { .. }
            | ErrorImpl::UnsupportedProduction { .. }
            | ErrorImpl::InvalidParseStack => ErrorCategory::Syntax,
            ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::FunctionNotDeclared { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::AssignmentToUndeclared { .. }
            | ErrorImpl::AssignmentToConstant { .. }
            | ErrorImpl::InvalidAssignmentTarget
            | ErrorImpl::NonConstantInitializer { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. }
            | ErrorImpl::ReturnValueInVoidFunction { .. } => ErrorCategory::Semantic,
            ErrorImpl::BuilderError { .. }
            | ErrorImpl::VerificationError { .. }
            | ErrorImpl::UnexpectedNode { .. } => ErrorCategory::Backend,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::MalformedGrammarLine { .. } => "MalformedGrammarLine",
            ErrorImpl::UnresolvedSymbol { .. } => "UnresolvedSymbol",
            ErrorImpl::InvalidProduction { .. } => "InvalidProduction",
            ErrorImpl::EmptyGrammar => "EmptyGrammar",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::MissingGoto { .. } => "MissingGoto",
            ErrorImpl::UnsupportedProduction { .. } => "UnsupportedProduction",
            ErrorImpl::InvalidParseStack => "InvalidParseStack",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::AssignmentToUndeclared { .. } => "AssignmentToUndeclared",
            ErrorImpl::AssignmentToConstant { .. } => "AssignmentToConstant",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::NonConstantInitializer { .. } => "NonConstantInitializer",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ReturnValueInVoidFunction { .. } => "ReturnValueInVoidFunction",
            ErrorImpl::BuilderError { .. } => "BuilderError",
            ErrorImpl::VerificationError { .. } => "VerificationError",
            ErrorImpl::UnexpectedNode { .. } => "UnexpectedNode",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::MalformedGrammarLine { line } => ErrorTip::Suggestion(format!(
                "Expected `LHS -> RHS | ...`, found `{}`",
                line
            )),
            ErrorImpl::UnresolvedSymbol { symbol } => ErrorTip::Suggestion(format!(
                "`{}` is neither a nonterminal nor a known terminal name",
                symbol
            )),
            ErrorImpl::InvalidProduction { id } => {
                ErrorTip::Suggestion(format!("No production with id {}", id))
            }
            ErrorImpl::EmptyGrammar => {
                ErrorTip::Suggestion(String::from("The grammar contains no rules"))
            }
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::MissingGoto { state, symbol } => ErrorTip::Suggestion(format!(
                "No goto entry for state {} on `{}`",
                state, symbol
            )),
            ErrorImpl::UnsupportedProduction { production } => ErrorTip::Suggestion(format!(
                "No construction rule for `{}`",
                production
            )),
            ErrorImpl::InvalidParseStack => ErrorTip::None,
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::FunctionNotDeclared { function } => ErrorTip::Suggestion(format!(
                "Function `{}` must be defined before it is called",
                function
            )),
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::AssignmentToUndeclared { variable } => ErrorTip::Suggestion(format!(
                "Cannot assign to undeclared variable `{}`",
                variable
            )),
            ErrorImpl::AssignmentToConstant { variable } => {
                ErrorTip::Suggestion(format!("`{}` is declared const", variable))
            }
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only variables can appear on the left of `=`",
            )),
            ErrorImpl::NonConstantInitializer { variable } => ErrorTip::Suggestion(format!(
                "Initializer of global `{}` is not a compile-time constant",
                variable
            )),
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ReturnValueInVoidFunction { function } => ErrorTip::Suggestion(format!(
                "`{}` returns void, the value is discarded",
                function
            )),
            ErrorImpl::BuilderError { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::VerificationError { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::UnexpectedNode { node } => {
                ErrorTip::Suggestion(format!("`{}` cannot appear here", node))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.position.1, self.position.0, self.internal_error
        )
    }
}

impl std::error::Error for Error {}

impl From<inkwell::builder::BuilderError> for Error {
    fn from(error: inkwell::builder::BuilderError) -> Self {
        Error::new(
            ErrorImpl::BuilderError {
                message: error.to_string(),
            },
            Position::null(),
        )
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },

    #[error("malformed grammar line: {line:?}")]
    MalformedGrammarLine { line: String },
    #[error("unresolved grammar symbol {symbol:?}")]
    UnresolvedSymbol { symbol: String },
    #[error("invalid production id {id}")]
    InvalidProduction { id: usize },
    #[error("grammar contains no productions")]
    EmptyGrammar,

    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("no goto for state {state} on {symbol:?}")]
    MissingGoto { state: usize, symbol: String },
    #[error("no construction rule for production {production:?}")]
    UnsupportedProduction { production: String },
    #[error("parser stack is inconsistent")]
    InvalidParseStack,

    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("function {function:?} not declared")]
    FunctionNotDeclared { function: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("assignment to undeclared variable {variable:?}")]
    AssignmentToUndeclared { variable: String },
    #[error("assignment to constant {variable:?}")]
    AssignmentToConstant { variable: String },
    #[error("left side of assignment is not a variable")]
    InvalidAssignmentTarget,
    #[error("initializer of {variable:?} is not constant")]
    NonConstantInitializer { variable: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("value returned from void function {function:?}")]
    ReturnValueInVoidFunction { function: String },

    #[error("builder error: {message}")]
    BuilderError { message: String },
    #[error("module verification failed: {message}")]
    VerificationError { message: String },
    #[error("unexpected node {node:?}")]
    UnexpectedNode { node: String },
}
