// Error handling for compilation and execution
//
// CodegenError covers everything that can go wrong before a program exists
// (lexing, parsing, type checking). RuntimeError covers failures while the
// VM or a registered function runs.

use thiserror::Error;

// Import Span type from parser AST
pub use parser::ast::Span;
use parser::error::ParseError;

/// Compile-time error types
#[derive(Debug, Clone, Error)]
pub enum CodegenError {
    /// Lexing or parsing failed
    #[error("Syntax error: {message}")]
    Syntax {
        message: String,
        errors: Vec<ParseError>,
    },

    /// Type mismatch or incompatibility
    #[error("Type error in {context}: expected {expected}, found {found}")]
    TypeError {
        expected: String,
        found: String,
        context: String,
        span: Option<Span>,
    },

    /// Variable or function not found in the environment
    #[error("Undefined symbol '{name}' in {context}")]
    UndefinedSymbol {
        name: String,
        context: String,
        span: Option<Span>,
    },

    /// Operator applied to operands it is not defined for
    #[error("Invalid operation '{operation}': {reason}")]
    InvalidOperation {
        operation: String,
        reason: String,
        span: Option<Span>,
    },

    /// Call to a function with a fixed signature and the wrong arity
    #[error("Function '{name}' expects {expected} arguments, found {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
        span: Option<Span>,
    },
}

impl CodegenError {
    /// Get the exit code for this error type
    /// Used by main.rs to return specific exit codes
    pub fn exit_code(&self) -> i32 {
        match self {
            CodegenError::Syntax { .. } => 101,
            CodegenError::TypeError { .. } => 102,
            CodegenError::UndefinedSymbol { .. } => 103,
            CodegenError::InvalidOperation { .. } => 104,
            CodegenError::ArgumentCount { .. } => 105,
        }
    }

    /// Source location of the error, when known
    pub fn span(&self) -> Option<Span> {
        match self {
            CodegenError::Syntax { errors, .. } => errors.first().map(|e| e.span()),
            CodegenError::TypeError { span, .. }
            | CodegenError::UndefinedSymbol { span, .. }
            | CodegenError::InvalidOperation { span, .. }
            | CodegenError::ArgumentCount { span, .. } => span.clone(),
        }
    }
}

/// Run-time error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A function received the wrong number of arguments
    #[error("{function}: expected {expected} arguments, found {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    /// A value's string form is not a decimal numeral
    #[error("cannot parse {input:?} as a decimal")]
    Parse { input: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{operation}'")]
    IntegerOverflow { operation: String },

    /// Operator or builtin applied to values of the wrong kind
    #[error("invalid operation '{operation}' on {found}")]
    Type { operation: String, found: String },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// Failure reported by a caller-registered function
    #[error("{function}: {message}")]
    Function { function: String, message: String },

    /// Malformed bytecode; only reachable through a compiler bug
    #[error("stack underflow")]
    StackUnderflow,
}

impl RuntimeError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::ArgumentCount { .. } => 200,
            RuntimeError::Parse { .. } => 201,
            RuntimeError::DivisionByZero => 202,
            RuntimeError::IntegerOverflow { .. } => 203,
            RuntimeError::Type { .. } => 204,
            RuntimeError::UnknownVariable { .. } => 205,
            RuntimeError::IndexOutOfBounds { .. } => 206,
            RuntimeError::Function { .. } => 207,
            RuntimeError::StackUnderflow => 208,
        }
    }
}

/// Convenient Result type for compile-time operations
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Convenient Result type for run-time operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
