use std::io;
use thiserror::Error;

/// What went wrong, structurally, while parsing a `.dbc` token stream.
///
/// The kind is diagnostic metadata next to the human-readable message; the
/// parser aborts on the first error either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedToken,
    InvalidValueType,
    InvalidInteger,
    MissingMessageId,
    InvalidAttributeValue,
    UnexpectedEndOfFile,
    InvalidSignalFormat,
    InvalidMultiplexer,
    InvalidNodeName,
    InvalidMessageFormat,
    InvalidFloatFormat,
    InvalidStringFormat,
    /// Reserved: safe Rust aborts on allocation failure, so this kind is
    /// never produced here. Kept so downstream match arms stay exhaustive
    /// across bindings to other implementations of the same taxonomy.
    MemoryAllocationFailed,
}

/// A structural parse failure with its source location.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        ParseError {
            kind,
            message: message.into(),
            line,
            column,
        }
    }
}

/// Errors produced by the file-level loading entry points.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Not a valid .dbc file: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}
