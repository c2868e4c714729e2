//! Error types for nmapwrap

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input text is not well-formed XML
    MalformedXml,
    MaxDepthExceeded {
        max: u16,
    },
    MaxSizeExceeded {
        max: usize,
    },
    /// A tag segment of a dotted path has no matching child
    PathNotFound {
        segment: String,
        path: String,
        root: String,
    },
    AttributeNotFound {
        tag: String,
        attribute: String,
    },
    KeyNotFound {
        tag: String,
        key: String,
    },
    /// Alias declared with an empty path or an empty segment
    InvalidPath {
        path: String,
    },
    ToolNotFound {
        tool: String,
    },
    Command {
        message: String,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedXml => write!(f, "malformed xml"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::PathNotFound {
                segment,
                path,
                root,
            } => write!(
                f,
                "no <{segment}> tag while resolving path '{path}' from <{root}>"
            ),
            Self::AttributeNotFound { tag, attribute } => {
                write!(f, "<{tag}> has no attribute '{attribute}'")
            }
            Self::KeyNotFound { tag, key } => {
                write!(f, "<{tag}> has no attribute or child named '{key}'")
            }
            Self::InvalidPath { path } => write!(f, "invalid dotted path: '{path}'"),
            Self::ToolNotFound { tool } => {
                write!(f, "{tool} command not found. Is it in your PATH?")
            }
            Self::Command { message } => write!(f, "command failed: {message}"),
        }
    }
}

/// Main error type for nmapwrap
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    /// Create an error that has no source location
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Malformed-xml error at a specific position
    pub fn malformed(pos: Pos, message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::MalformedXml, Span::at(pos), message)
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for every failure raised while parsing input text
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedXml
                | ErrorKind::MaxDepthExceeded { .. }
                | ErrorKind::MaxSizeExceeded { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_parse_error() {
            write!(f, "error at {}: {}", self.span.start, self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

/// Result type alias for nmapwrap
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of an alias read.
///
/// Lookup failures arrive as [`ReadError::Resolve`]; the cast function's own
/// error is passed through untouched as [`ReadError::Cast`].
#[derive(Error, Debug, PartialEq)]
pub enum ReadError<E> {
    #[error(transparent)]
    Resolve(#[from] Error),
    #[error(transparent)]
    Cast(E),
}

impl<E> ReadError<E> {
    /// The lookup error, if resolution failed
    pub fn as_resolve(&self) -> Option<&Error> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Cast(_) => None,
        }
    }

    /// The cast error, if the cast function rejected the raw value
    pub fn as_cast(&self) -> Option<&E> {
        match self {
            Self::Resolve(_) => None,
            Self::Cast(err) => Some(err),
        }
    }
}

impl From<ReadError<std::convert::Infallible>> for Error {
    fn from(err: ReadError<std::convert::Infallible>) -> Self {
        match err {
            ReadError::Resolve(err) => err,
            ReadError::Cast(never) => match never {},
        }
    }
}
