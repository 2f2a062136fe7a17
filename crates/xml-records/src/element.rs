/*
 * element.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Element values handed to accumulators, and the frames they are
//! assembled from while an element is open.

use std::collections::HashMap;

/// How whitespace around element text is treated.
///
/// Applied once to the whole text run of an element when it closes, so text
/// split by comments or CDATA sections keeps its inner whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextMode {
    /// Trim leading and trailing whitespace; a blank run counts as no text.
    #[default]
    Trimmed,
    /// Keep text exactly as written, including indentation between tags.
    Preserved,
}

/// A completed element: its name, text and attributes.
///
/// Child elements are not included; they reach the accumulator as
/// separate values, before their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementValue {
    /// The qualified element name as written (e.g. `dc:creator`).
    pub name: String,

    /// The last contiguous run of text before the end tag, if any.
    pub text: Option<String>,

    /// Attribute values keyed by qualified name.
    pub attributes: HashMap<String, String>,
}

impl ElementValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            attributes: HashMap::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The text content, treating a missing text as empty.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Text content that contains something other than whitespace.
    pub fn non_blank_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Text gathered for an element that has been opened but not yet closed.
#[derive(Debug, Default)]
pub(crate) struct ElementFrame {
    text: Option<String>,
    /// Set while consecutive text tokens belong to one run.
    in_text_run: bool,
}

impl ElementFrame {
    pub(crate) fn push_text(&mut self, text: &str) {
        match self.text.as_mut() {
            Some(existing) if self.in_text_run => existing.push_str(text),
            _ => self.text = Some(text.to_string()),
        }
        self.in_text_run = true;
    }

    /// A child element opened; the next text token starts a new run.
    pub(crate) fn break_text_run(&mut self) {
        self.in_text_run = false;
    }

    pub(crate) fn close(
        self,
        name: String,
        attributes: HashMap<String, String>,
        text_mode: TextMode,
    ) -> ElementValue {
        let text = match text_mode {
            TextMode::Preserved => self.text,
            TextMode::Trimmed => self
                .text
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        };
        ElementValue {
            name,
            text,
            attributes,
        }
    }
}
