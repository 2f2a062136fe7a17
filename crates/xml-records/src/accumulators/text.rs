/*
 * text.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::{Accumulator, ElementValue};

/// Produces the last non-blank text seen in a record's subtree.
///
/// Subtrees without any text are skipped.
#[derive(Debug, Clone, Default)]
pub struct TextAccumulator {
    value: Option<String>,
}

impl TextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Accumulator for TextAccumulator {
    type Record = String;

    fn visit(&mut self, element: ElementValue) {
        if let Some(text) = element.non_blank_text() {
            self.value = Some(text.to_string());
        }
    }

    fn can_produce(&self) -> bool {
        self.value.is_some()
    }

    fn produce(&mut self) -> String {
        self.value.take().unwrap_or_default()
    }

    fn reset(&mut self) {
        self.value = None;
    }
}
