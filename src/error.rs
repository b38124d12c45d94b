// Licensed under MIT. See LICENSE for details.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tree::Rule;

/// Position of a diagnostic in the source text, both 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Computes the line/column of a byte offset into `source`.
    pub fn of_offset(source: &str, offset: usize) -> Self {
        let prefix = &source[..offset.min(source.len())];
        let line = prefix.matches('\n').count() + 1;
        let column = match prefix.rfind('\n') {
            Some(nl) => prefix[nl + 1..].chars().count() + 1,
            None => prefix.chars().count() + 1,
        };
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.column)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Lexer error at {position} - token recognition error at: '{text}'")]
pub struct LexError {
    pub position: Position,
    pub text: String,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SyntaxError {
    #[error("Parser error at {position} - mismatched input '{found}'")]
    Mismatched { position: Position, found: String },

    #[error("Parser error at {position} - extraneous input '{found}' expecting <EOF>")]
    Trailing { position: Position, found: String },

    #[error("Parser error - unexpected end of input")]
    UnexpectedEnd,
}

/// Violations of the stack-machine invariants while building an AST. These
/// mean the rule policy and the grammar arities disagree; the current input
/// cannot be trusted afterwards.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AstError {
    #[error("stack underflow exiting {rule:?}: expected {expected} children, stack holds {available}")]
    StackUnderflow {
        rule: Rule,
        expected: usize,
        available: usize,
    },

    #[error("stack is empty when attaching children of {rule:?}")]
    EmptyStack { rule: Rule },

    #[error("pass-through rule {rule:?} has {children} direct children, expected exactly 1")]
    ArityMismatch { rule: Rule, children: usize },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}", syntax_message(.dialect, .lexer_errors, .parser_errors))]
    Syntax {
        dialect: &'static str,
        lexer_errors: usize,
        parser_errors: usize,
    },

    #[error("Error during AST generation for the {dialect}: {source}")]
    Construction {
        dialect: &'static str,
        #[source]
        source: AstError,
    },

    #[error("AST generation completed without any explicit errors, but returned a null AST root.")]
    EmptyAst,
}

fn syntax_message(dialect: &str, lexer_errors: &usize, parser_errors: &usize) -> String {
    let mut parts = vec![];
    if *lexer_errors > 0 {
        parts.push(format!("{} lexer error(s)", lexer_errors));
    }
    if *parser_errors > 0 {
        parts.push(format!("{} parser error(s)", parser_errors));
    }
    format!(
        "No AST generated for the {} due to {}.",
        dialect,
        parts.join(" and ")
    )
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration format: {0}")]
    Format(#[from] toml::de::Error),

    #[error("invalid configuration value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Invalid Job: {0}")]
    UnknownJob(String),

    #[error("input file does not exist or is not a file: {0:?}")]
    MissingInput(PathBuf),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_offset() {
        let src = "ab\ncd\n\nef";
        assert_eq!(Position::of_offset(src, 0), Position { line: 1, column: 1 });
        assert_eq!(Position::of_offset(src, 1), Position { line: 1, column: 2 });
        assert_eq!(Position::of_offset(src, 3), Position { line: 2, column: 1 });
        assert_eq!(Position::of_offset(src, 8), Position { line: 4, column: 2 });
        assert_eq!(Position::of_offset(src, 100), Position { line: 4, column: 3 });
    }

    #[test]
    fn test_syntax_message() {
        let err = PipelineError::Syntax {
            dialect: "Dynamic Logic",
            lexer_errors: 1,
            parser_errors: 0,
        };
        assert_eq!(
            err.to_string(),
            "No AST generated for the Dynamic Logic due to 1 lexer error(s)."
        );

        let err = PipelineError::Syntax {
            dialect: "Relational Dynamic Logic",
            lexer_errors: 2,
            parser_errors: 1,
        };
        assert_eq!(
            err.to_string(),
            "No AST generated for the Relational Dynamic Logic due to 2 lexer error(s) and 1 parser error(s)."
        );
    }
}
