//! Unified error types for pysbom.
//!
//! The hierarchy separates discovery (reading package sources) from
//! assembly (building and serializing the document), with rich context
//! for debugging and user-friendly messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pysbom operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomGenError {
    /// Errors while reading a package source
    #[error("Failed to read package source: {context}")]
    Source {
        context: String,
        #[source]
        source: SourceErrorKind,
    },

    /// Errors during document assembly or serialization
    #[error("Document assembly failed: {context}")]
    Assemble {
        context: String,
        #[source]
        source: AssembleErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific source-reader error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SourceErrorKind {
    #[error("Invalid TOML document: {0}")]
    InvalidToml(String),
}

/// Specific assembly error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AssembleErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(String),

    #[error("Project identity unavailable: {0}")]
    MissingProjectIdentity(String),
}

/// Convenient Result type for pysbom operations
pub type Result<T> = std::result::Result<T, SbomGenError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomGenError {
    /// Create a source error with context
    pub fn source(context: impl Into<String>, source: SourceErrorKind) -> Self {
        Self::Source {
            context: context.into(),
            source,
        }
    }

    /// Create an assembly error with context
    pub fn assemble(context: impl Into<String>, source: AssembleErrorKind) -> Self {
        Self::Assemble {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SbomGenError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SbomGenError {
    fn from(err: serde_json::Error) -> Self {
        Self::assemble(
            "JSON serialization",
            AssembleErrorKind::JsonSerialization(err.to_string()),
        )
    }
}

impl From<toml::de::Error> for SbomGenError {
    fn from(err: toml::de::Error) -> Self {
        Self::source(
            "TOML deserialization",
            SourceErrorKind::InvalidToml(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context,
/// creating a chain that shows the path through the code.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    ///
    /// The closure is only called if the result is an error,
    /// which is more efficient when the context string is expensive to compute.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomGenError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: SbomGenError, new_ctx: &str) -> SbomGenError {
    match err {
        SbomGenError::Source {
            context: existing,
            source,
        } => SbomGenError::Source {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomGenError::Assemble {
            context: existing,
            source,
        } => SbomGenError::Assemble {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomGenError::Io {
            path,
            message,
            source,
        } => SbomGenError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomGenError::Config(msg) => SbomGenError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
