/*
 * stack.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The node stack and the classifier that places each closed element
//! relative to the record root.

use crate::{Error, PathSpec, Result};
use std::collections::HashMap;
use std::fmt;

/// Position of a just-closed element relative to the selected record root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthClass {
    /// Not part of any record.
    Outside,
    /// The record root itself; its end tag completes a record.
    AtRoot,
    /// Nested somewhere beneath a record root.
    Inside,
}

impl DepthClass {
    /// Whether elements of this class are handed to the accumulator.
    pub fn is_visited(self) -> bool {
        matches!(self, DepthClass::AtRoot | DepthClass::Inside)
    }
}

/// The currently open elements, outermost first: their names, and the
/// attributes each was opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeStack {
    names: Vec<String>,
    attributes: Vec<HashMap<String, String>>,
}

impl NodeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an element without attributes.
    pub fn push(&mut self, name: String) {
        self.push_element(name, HashMap::new());
    }

    pub fn push_element(&mut self, name: String, attributes: HashMap<String, String>) {
        self.names.push(name);
        self.attributes.push(attributes);
    }

    /// Close the innermost element, checking that `name` matches it.
    pub fn pop(&mut self, name: &str) -> Result<String> {
        self.pop_element(name).map(|(open, _)| open)
    }

    /// Like [`pop`](Self::pop), also returning the element's attributes.
    pub fn pop_element(&mut self, name: &str) -> Result<(String, HashMap<String, String>)> {
        let open = self.names.pop().ok_or_else(|| Error::UnbalancedEndTag {
            found: name.to_string(),
        })?;
        let attributes = self.attributes.pop().unwrap_or_default();

        if open != name {
            return Err(Error::MismatchedEndTag {
                expected: open,
                found: name.to_string(),
            });
        }

        Ok((open, attributes))
    }

    /// Attributes of the open element at `depth` (0 is the outermost).
    pub fn attributes_at(&self, depth: usize) -> Option<&HashMap<String, String>> {
        self.attributes.get(depth)
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn top(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }
}

/// Decides whether an element is a record root, given the names of the
/// elements open down to it and the element's own attributes.
pub type RootPredicate = Box<dyn Fn(&[String], &HashMap<String, String>) -> bool>;

/// How record roots are recognised.
///
/// A path and a predicate are mutually exclusive ways to pick them.
pub enum Selection {
    Path(PathSpec),
    /// Accepts a node stack when its innermost element is a record root.
    Predicate(RootPredicate),
}

impl Selection {
    /// Classify the innermost element of `stack`, which is about to close.
    ///
    /// Must be called before the element is popped.
    pub fn classify(&self, stack: &NodeStack) -> DepthClass {
        let names = stack.names();
        match self {
            Selection::Path(path) => {
                if !path.is_prefix_of(names) {
                    DepthClass::Outside
                } else if names.len() == path.len() {
                    DepthClass::AtRoot
                } else {
                    DepthClass::Inside
                }
            }
            Selection::Predicate(accepts) => {
                let no_attributes = HashMap::new();
                let accepts_prefix = |len: usize| {
                    let attributes = stack.attributes_at(len - 1).unwrap_or(&no_attributes);
                    accepts(&names[..len], attributes)
                };

                if names.is_empty() {
                    DepthClass::Outside
                } else if accepts_prefix(names.len()) {
                    DepthClass::AtRoot
                } else if (1..names.len()).any(accepts_prefix) {
                    DepthClass::Inside
                } else {
                    DepthClass::Outside
                }
            }
        }
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Selection::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
