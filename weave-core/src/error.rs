use thiserror::Error;

use crate::Type;

/// Errors detected while composing functions.
///
/// Every variant is raised by the constructor, before a composed function
/// exists. Function indices are positions in the list given to the
/// constructor; `position` fields index the producer's return values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("composition requires at least 2 functions, got {count}")]
    TooFewFunctions { count: usize },

    #[error("argument {index} is not a function: found `{found}`")]
    NotAFunction { index: usize, found: Type },

    #[error(
        "incorrect argument length at function {index}: return length {returns} != argument length {params}"
    )]
    ArityMismatch {
        index: usize,
        returns: usize,
        params: usize,
    },

    #[error(
        "argument mismatch in function {index} at {position}: return type `{returned}` != argument type `{expected}`"
    )]
    TypeMismatch {
        index: usize,
        position: usize,
        returned: Type,
        expected: Type,
    },

    #[error(
        "too few returns preceding function {index}: {returns} returned, {fixed} fixed arguments required"
    )]
    VariadicArityTooShort {
        index: usize,
        returns: usize,
        fixed: usize,
    },

    #[error(
        "return value {position} preceding function {index} does not match variadic type: `{returned}` != `{expected}`"
    )]
    VariadicTypeMismatch {
        index: usize,
        position: usize,
        returned: Type,
        expected: Type,
    },
}

/// Errors raised when a function is invoked with values of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("expected {expected} arguments, got {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("expected at least {minimum} arguments, got {found}")]
    TooFewArguments { minimum: usize, found: usize },

    #[error("argument {position} has type `{found}`, expected `{expected}`")]
    ArgumentType {
        position: usize,
        expected: Type,
        found: Type,
    },

    #[error("spread call on non-variadic function `{signature}`")]
    NotVariadic { signature: String },

    #[error("expected {expected} return values, got {found}")]
    ReturnCount { expected: usize, found: usize },

    #[error("return value {position} has type `{found}`, expected `{expected}`")]
    ReturnType {
        position: usize,
        expected: Type,
        found: Type,
    },
}

/// A typed view was requested with a signature the function does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot view `{actual}` as `{expected}`")]
pub struct SignatureMismatch {
    pub expected: String,
    pub actual: String,
}

/// Errors raised by [`SignatureBuilder::build`](crate::SignatureBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("parameter `{ty}` declared after the variadic slot")]
    ParamAfterVariadic { ty: Type },

    #[error("variadic slot declared more than once")]
    DuplicateVariadic,
}
