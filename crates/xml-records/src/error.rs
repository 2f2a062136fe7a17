/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for record extraction.

use thiserror::Error;

/// Result type alias for xml-records operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving an extraction.
#[derive(Debug, Error)]
pub enum Error {
    /// The extraction was assembled with missing or conflicting parts.
    ///
    /// Only ever returned while building, never during iteration.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The token source could not produce the next token.
    #[error("XML syntax error: {message}{}", .position.map(|p| format!(" at byte {}", p)).unwrap_or_default())]
    TokenSource {
        message: String,
        /// Byte offset where the error occurred, when the source knows it.
        position: Option<u64>,
    },

    /// Reading the underlying input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An end tag arrived while no element was open.
    #[error("Unexpected closing tag </{found}> with no open element")]
    UnbalancedEndTag { found: String },

    /// An end tag did not close the innermost open element.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// The document ended while elements were still open.
    #[error("Unexpected end of input, expected closing tag </{name}>")]
    UnclosedElement { name: String },

    /// The pull protocol was misused by the caller.
    #[error("Sequence protocol error: {message}")]
    SequenceProtocol { message: String },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Error::SequenceProtocol {
            message: message.into(),
        }
    }

    /// True for malformed token streams, whether reported by the tokenizer
    /// or detected by the node stack.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::TokenSource { .. }
                | Error::UnbalancedEndTag { .. }
                | Error::MismatchedEndTag { .. }
                | Error::UnclosedElement { .. }
        )
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => Error::Io(std::io::Error::new(io.kind(), io.to_string())),
            other => Error::TokenSource {
                message: other.to_string(),
                position: None,
            },
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::TokenSource {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}
