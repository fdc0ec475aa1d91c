//! # Render Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stage            Error                    Cached artifact afterwards   │
//! │  ─────            ─────                    ─────────────────────────    │
//! │  load source      RenderError::Source      none (next call retries)     │
//! │  compile          RenderError::Compile     none (next call retries)     │
//! │  render           RenderError::Render      kept, it was valid           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any of these on a deployed page means broken markup or a data shape the
//! page does not expect, so the web layer logs them at `error`.

use std::io;

use thiserror::Error;

/// Errors from [`crate::RenderCache::render`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {name} could not be loaded: {source}")]
    Source {
        name: String,
        #[source]
        source: SourceError,
    },

    #[error("template {name} failed to compile: {source}")]
    Compile {
        name: String,
        #[source]
        source: CompileError,
    },

    #[error("template {name} failed to render: {source}")]
    Render {
        name: String,
        #[source]
        source: DataError,
    },
}

/// A template source could not be read.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no template named {0}")]
    NotFound(String),

    #[error("reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Markup that cannot be compiled. Offsets are byte offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unterminated tag at byte {offset}")]
    Unterminated { offset: usize },

    #[error("empty tag at byte {offset}")]
    EmptyTag { offset: usize },

    #[error("unknown function {name} at byte {offset}")]
    UnknownFunction { name: String, offset: usize },

    #[error("{function} takes {expected} arguments, got {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid field path '{path}'")]
    InvalidPath { path: String },

    #[error("unknown block '{tag}' at byte {offset}")]
    UnknownBlock { tag: String, offset: usize },

    #[error("unexpected '{{{{/each}}}}' at byte {offset}")]
    UnexpectedClose { offset: usize },

    #[error("'{{{{#each}}}}' opened at byte {offset} is never closed")]
    UnclosedEach { offset: usize },

    #[error("layout has no '{{{{> content}}}}' slot")]
    MissingSlot,
}

/// Data that does not fit the shape a compiled template walks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("field {path} is missing")]
    MissingField { path: String },

    #[error("field {path} is not a list")]
    NotIterable { path: String },

    #[error("field {path} cannot be printed")]
    NotPrintable { path: String },

    #[error("{function} needs a money value at {path}")]
    BadArgument { function: &'static str, path: String },

    #[error("render data could not be serialized: {0}")]
    Unserializable(String),
}

/// Result type for render cache operations.
pub type RenderResult<T> = Result<T, RenderError>;
