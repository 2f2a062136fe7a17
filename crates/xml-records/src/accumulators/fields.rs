/*
 * fields.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::{Accumulator, ElementValue};
use serde::Serialize;
use std::cell::Cell;
use std::collections::BTreeMap;

/// A record as a flat map of element texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldRecord {
    /// Name of the record root element.
    pub name: String,

    /// Attributes of the record root element.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Text of the root element itself, when it has any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Text of every descendant element that has some, keyed by element name.
    pub fields: BTreeMap<String, FieldValue>,
}

impl FieldRecord {
    /// First value recorded for `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FieldValue::Single(value) => Some(value),
            FieldValue::Many(values) => values.first().map(String::as_str),
        }
    }
}

/// One field, or all values of a repeated element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(first) => {
                *self = FieldValue::Many(vec![std::mem::take(first), value]);
            }
            FieldValue::Many(values) => values.push(value),
        }
    }
}

/// Collects descendant texts into a [`FieldRecord`].
///
/// Works with any document shape. The last element visited before a record
/// is requested is the record root; its name and attributes become the
/// record's own. Descendants without text are ignored, repeated names
/// collect every value.
///
/// Required field names make `can_produce` answer false when any of them
/// is missing. The data of a subtree skipped that way is discarded on the
/// next visit.
#[derive(Debug, Default)]
pub struct FieldsAccumulator {
    required: Vec<String>,
    fields: BTreeMap<String, FieldValue>,
    last: Option<ElementValue>,
    /// Set once `can_produce` has looked at a completed subtree.
    queried: Cell<bool>,
}

impl FieldsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only produce records that contain all of `fields`.
    pub fn with_required<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn add_field(&mut self, element: ElementValue) {
        let Some(text) = element.non_blank_text() else {
            return;
        };
        let text = text.to_string();
        match self.fields.get_mut(&element.name) {
            Some(existing) => existing.push(text),
            None => {
                self.fields.insert(element.name, FieldValue::Single(text));
            }
        }
    }
}

impl Accumulator for FieldsAccumulator {
    type Record = FieldRecord;

    fn visit(&mut self, element: ElementValue) {
        if self.queried.replace(false) {
            // The previous subtree was rejected; start over.
            self.reset();
        }
        if let Some(previous) = self.last.replace(element) {
            self.add_field(previous);
        }
    }

    fn can_produce(&self) -> bool {
        self.queried.set(true);
        self.last.is_some()
            && self
                .required
                .iter()
                .all(|name| self.fields.contains_key(name))
    }

    fn produce(&mut self) -> FieldRecord {
        let root = self.last.take().unwrap_or_else(|| ElementValue::new(""));
        FieldRecord {
            text: root.non_blank_text().map(str::to_string),
            name: root.name,
            attributes: root.attributes.into_iter().collect(),
            fields: std::mem::take(&mut self.fields),
        }
    }

    fn reset(&mut self) {
        self.fields.clear();
        self.last = None;
        self.queried.set(false);
    }
}
