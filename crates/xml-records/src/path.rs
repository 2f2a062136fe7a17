/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Node paths that identify the root element of each record.

use crate::{Error, Result};
use std::fmt;

/// Separator used by [`PathSpec::parse`].
pub const DEFAULT_SEPARATOR: char = '/';

/// An ordered, non-empty list of element names such as `rss/channel/item`.
///
/// Leading and trailing separators are ignored and each segment is trimmed,
/// so `" /bookstore/ book/ "` and `"bookstore/book"` describe the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    segments: Vec<String>,
}

impl PathSpec {
    /// Parse a `/`-separated path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the path has no segments.
    pub fn parse(path: &str) -> Result<Self> {
        Self::parse_with_separator(path, DEFAULT_SEPARATOR)
    }

    /// Parse a path using a custom single-character separator.
    pub fn parse_with_separator(path: &str, separator: char) -> Result<Self> {
        Self::from_segments(path.split(separator)).map_err(|_| {
            Error::configuration(format!(
                "path '{}' contains no element names (separator '{}')",
                path, separator
            ))
        })
    }

    /// Build a path from already separated segments.
    ///
    /// Segments are trimmed and blank ones dropped.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(Error::configuration("path contains no element names"));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments; always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false, a path has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Name of the record root element (the last segment).
    pub fn leaf(&self) -> &str {
        // Non-empty by construction.
        &self.segments[self.segments.len() - 1]
    }

    /// True when the first `len()` names of `stack` equal the path, compared
    /// segment by segment.
    pub fn is_prefix_of(&self, stack: &[String]) -> bool {
        stack.len() >= self.segments.len()
            && self
                .segments
                .iter()
                .zip(stack)
                .all(|(segment, name)| segment == name)
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl std::str::FromStr for PathSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
