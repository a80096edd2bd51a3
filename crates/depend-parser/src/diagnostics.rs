use depend_ast::{ContextError, Position};
use depend_lexer::{LexError, LexErrorKind};
use miette::Diagnostic;
use thiserror::Error;

/// Stable, machine-checkable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TokenStreamEnd,
    UnexpectedToken,
    InvalidState,
    Context,
}

/// Fatal parse failure for one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("Unexpected end of token stream in file: {file}.")]
    #[diagnostic(code(depend::token_stream_end))]
    TokenStreamEnd { file: String, position: Position },

    #[error(
        "Unexpected token: {image}, line: {}, col: {}, file: {file}.",
        .position.line,
        .position.column
    )]
    #[diagnostic(code(depend::unexpected_token))]
    UnexpectedToken {
        image: String,
        position: Position,
        file: String,
    },

    #[error("{message}")]
    #[diagnostic(code(depend::invalid_state))]
    InvalidState {
        message: String,
        position: Position,
        file: String,
    },

    #[error(transparent)]
    #[diagnostic(code(depend::context))]
    Context(#[from] ContextError),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::TokenStreamEnd { .. } => ErrorKind::TokenStreamEnd,
            ParseError::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            ParseError::InvalidState { .. } => ErrorKind::InvalidState,
            ParseError::Context(_) => ErrorKind::Context,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::TokenStreamEnd { position, .. }
            | ParseError::UnexpectedToken { position, .. }
            | ParseError::InvalidState { position, .. } => Some(*position),
            ParseError::Context(_) => None,
        }
    }

    /// Unterminated constructs run off the end of the stream; anything else is
    /// a token the grammar cannot start with.
    pub fn from_lex(error: LexError, source: &str, file: &str) -> Self {
        match error.kind {
            LexErrorKind::UnterminatedComment
            | LexErrorKind::UnterminatedString
            | LexErrorKind::UnterminatedHeredoc => ParseError::TokenStreamEnd {
                file: file.to_string(),
                position: error.position,
            },
            LexErrorKind::UnexpectedCharacter(_) => {
                let offset = error.offset as usize;
                let image = source[offset..]
                    .chars()
                    .next()
                    .map(String::from)
                    .unwrap_or_default();
                ParseError::UnexpectedToken {
                    image,
                    position: error.position,
                    file: file.to_string(),
                }
            }
        }
    }
}
