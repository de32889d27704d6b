use crate::frontend::operator::{CompareOperator, MathOperator};

use std::fmt;

pub const MAX_CALL_DEPTH: usize = 256;

/// Every diagnostic the language can raise. All of them are fatal.
#[derive(Debug, PartialEq, Clone)]
pub enum ErrorKind {
    // Lexing.
    LoneExclamation,
    UnterminatedString,
    IntegerTooLarge(String),

    // Declarations.
    MissingVariableName,
    MissingFunctionName,
    MissingParameterList(String),
    MissingFunctionBody(String),
    MalformedParameters(String),
    DuplicateParameter { function: String, parameter: String },
    ExclusiveWithoutDeclaration,

    // Calls.
    ArityMismatch { function: String, expected: usize, got: usize },
    MalformedArguments(String),
    NotAFunction(String),
    CallDepthExceeded,

    // Name resolution and assignment.
    UndefinedIdentifier(String),
    UndefinedVariable(String),
    UnassignedVariable(String),
    FunctionAsValue(String),
    AssignToNonVariable,
    AssignToFunction(String),
    AssignToExternal(String),
    MissingValue,

    // Imports.
    UnresolvedImport(String),
    UseWithoutPath,
    AliasWithoutName,
    AsWithoutUse,
    IllegalNesting { keyword: &'static str, place: &'static str },
    MalformedExternal,
    ScriptNotFound(String),
    MemberNotFound { script: String, member: String },
    ExclusiveAccess { script: String, member: String },

    // Expressions.
    InoperableTypes { left: &'static str, right: &'static str },
    InvalidStringOperator(MathOperator),
    DivideByZero,
    IntegerOverflow,
    MalformedExpression,
    MalformedComparison,
    NotComparable { op: CompareOperator, left: &'static str, right: &'static str },
    ConditionNotBool(&'static str),

    // Statement structure.
    MissingSemicolon,
    MissingBlock,
    UnterminatedBlock,
    UnterminatedParens,
    UnexpectedBlock,
    UnmatchedBrace,
    ReservedKeyword(&'static str),
    UnexpectedToken(String),
    Output(String),
}

impl ErrorKind {
    /// Attaches the statement line the error was raised at.
    pub fn at(self, line: usize) -> CrossoverError {
        CrossoverError { kind: self, line }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::LoneExclamation => write!(
                f,
                "exclamation mark (!) must have equals (=) immediately following it"
            ),
            ErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            ErrorKind::IntegerTooLarge(text) => {
                write!(f, "integer literal `{}` is too large", text)
            }
            ErrorKind::MissingVariableName => {
                write!(f, "variable must be named immediately after it is declared")
            }
            ErrorKind::MissingFunctionName => {
                write!(f, "function must be named immediately after it is declared")
            }
            ErrorKind::MissingParameterList(name) => {
                write!(f, "function `{}` must be followed by a parameter list", name)
            }
            ErrorKind::MissingFunctionBody(name) => write!(
                f,
                "function `{}` must be followed by a body in curly braces",
                name
            ),
            ErrorKind::MalformedParameters(name) => write!(
                f,
                "parameters of function `{}` must follow the pattern `var <name>, var <name>, ...`",
                name
            ),
            ErrorKind::DuplicateParameter {
                function,
                parameter,
            } => write!(
                f,
                "function `{}` declares parameter `{}` more than once",
                function, parameter
            ),
            ErrorKind::ExclusiveWithoutDeclaration => {
                write!(f, "`exclusive` must be followed by `var` or `function`")
            }
            ErrorKind::ArityMismatch {
                function,
                expected,
                got,
            } => write!(
                f,
                "function {} takes {} parameters, got {}",
                function, expected, got
            ),
            ErrorKind::MalformedArguments(name) => {
                write!(f, "malformed argument list in call to `{}`", name)
            }
            ErrorKind::NotAFunction(name) => write!(f, "`{}` is not a function", name),
            ErrorKind::CallDepthExceeded => write!(
                f,
                "maximum call depth of {} exceeded",
                MAX_CALL_DEPTH
            ),
            ErrorKind::UndefinedIdentifier(name) => write!(
                f,
                "could not find a parameter, function or variable named `{}`",
                name
            ),
            ErrorKind::UndefinedVariable(name) => {
                write!(f, "could not find a variable named `{}`", name)
            }
            ErrorKind::UnassignedVariable(name) => {
                write!(f, "variable `{}` is used before it is assigned a value", name)
            }
            ErrorKind::FunctionAsValue(name) => {
                write!(f, "function `{}` cannot be used as a value", name)
            }
            ErrorKind::AssignToNonVariable => write!(f, "cannot assign to non-variable"),
            ErrorKind::AssignToFunction(name) => {
                write!(f, "cannot assign to function `{}`", name)
            }
            ErrorKind::AssignToExternal(name) => {
                write!(f, "cannot assign to external member `{}`", name)
            }
            ErrorKind::MissingValue => write!(f, "assignment requires a value"),
            ErrorKind::UnresolvedImport(path) => write!(
                f,
                "could not find external script imported as: `{}`",
                path
            ),
            ErrorKind::UseWithoutPath => write!(f, "`use` must be followed by a path string"),
            ErrorKind::AliasWithoutName => write!(f, "`as` must be followed by an alias name"),
            ErrorKind::AsWithoutUse => {
                write!(f, "`as` must immediately follow the path of a `use` statement")
            }
            ErrorKind::IllegalNesting { keyword, place } => {
                write!(f, "cannot use `{}` inside {}", keyword, place)
            }
            ErrorKind::MalformedExternal => write!(
                f,
                "external access must have the form `external.<script>.<member>`"
            ),
            ErrorKind::ScriptNotFound(alias) => {
                write!(f, "could not find external script `{}`", alias)
            }
            ErrorKind::MemberNotFound { script, member } => write!(
                f,
                "external script `{}` has no member named `{}`",
                script, member
            ),
            ErrorKind::ExclusiveAccess { script, member } => write!(
                f,
                "`{}` is exclusive to external script `{}`",
                member, script
            ),
            ErrorKind::InoperableTypes { left, right } => {
                write!(f, "cannot operate on types {} and {}", left, right)
            }
            ErrorKind::InvalidStringOperator(op) => {
                write!(f, "strings can only be combined with `+`, not `{}`", op)
            }
            ErrorKind::DivideByZero => write!(f, "division by zero"),
            ErrorKind::IntegerOverflow => write!(f, "integer overflow"),
            ErrorKind::MalformedExpression => {
                write!(f, "expression must alternate between values and operators")
            }
            ErrorKind::MalformedComparison => write!(
                f,
                "comparison must have the form `<value> <operator> <value>`"
            ),
            ErrorKind::NotComparable { op, left, right } => write!(
                f,
                "cannot compare types {} and {} with `{}`",
                left, right, op
            ),
            ErrorKind::ConditionNotBool(type_name) => {
                write!(f, "condition must be a bool, got {}", type_name)
            }
            ErrorKind::MissingSemicolon => write!(f, "expected `;` at the end of the statement"),
            ErrorKind::MissingBlock => {
                write!(f, "`if` condition must be followed by a block in curly braces")
            }
            ErrorKind::UnterminatedBlock => write!(f, "missing closing `}}`"),
            ErrorKind::UnterminatedParens => write!(f, "missing closing `)`"),
            ErrorKind::UnexpectedBlock => write!(
                f,
                "a block may only follow a function declaration or an `if` condition"
            ),
            ErrorKind::UnmatchedBrace => write!(f, "unmatched `}}`"),
            ErrorKind::ReservedKeyword(keyword) => {
                write!(f, "`{}` is reserved and not supported", keyword)
            }
            ErrorKind::UnexpectedToken(token) => write!(f, "unexpected `{}`", token),
            ErrorKind::Output(message) => write!(f, "could not write output: {}", message),
        }
    }
}

/// A fatal error and the 1-based statement line it was raised at.
#[derive(Debug, PartialEq, Clone)]
pub struct CrossoverError {
    pub kind: ErrorKind,
    pub line: usize,
}

impl fmt::Display for CrossoverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.kind)
    }
}

impl std::error::Error for CrossoverError {}

pub type LexerResult<T> = Result<T, CrossoverError>;
pub type RuntimeResult<T> = Result<T, CrossoverError>;
pub type EvalResult<T> = Result<T, ErrorKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ErrorKind::ArityMismatch {
            function: "add".to_owned(),
            expected: 2,
            got: 3,
        }
        .at(4);

        assert_eq!(error.line, 4);
        assert_eq!(
            error.to_string(),
            "[line 4] Error: function add takes 2 parameters, got 3"
        );
        assert_eq!(ErrorKind::UnmatchedBrace.to_string(), "unmatched `}`");
    }
}
