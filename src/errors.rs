use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CompilerError {
    #[error("/compiler/parser: {0}")]
    Parse(#[from] pest::error::Error<crate::parser::Rule>),

    #[error("/compiler/assembler: step {step} carries an invalid operation: {text}")]
    InvalidOperation { step: usize, text: String },

    #[error("/compiler/assembler: step {step} carries an unresolvable reference: {text}")]
    InvalidReference { step: usize, text: String },

    #[error("/compiler/compiler: a {statement} statement was found outside of a loop")]
    NoEnclosingLoop { statement: String },

    #[error("/compiler/compiler: the function ${function} was passed {count} arguments, at most three are allowed")]
    TooManyArguments { function: String, count: usize },

    #[error("/compiler/intrinsics: {intrinsic} was passed a {actual} where a {expected} was expected")]
    ArgumentType {
        intrinsic: String,
        expected: String,
        actual: String,
    },

    #[error("/compiler/intrinsics: {intrinsic} was passed an invalid argument: {reason}")]
    ArgumentValue { intrinsic: String, reason: String },

    #[error("/compiler/intrinsics: {intrinsic} requires arguments of the same type, was passed a {first} and a {second}")]
    SameType {
        intrinsic: String,
        first: String,
        second: String,
    },
}
