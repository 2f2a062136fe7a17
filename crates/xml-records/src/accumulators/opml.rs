/*
 * opml.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::{Accumulator, ElementValue};
use serde::Serialize;

/// A subscribed feed from an OPML export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub xml_url: String,
}

impl Bookmark {
    /// Path of feed outlines nested one level under a category outline.
    pub const PATH: &'static str = "opml/body/outline/outline";
}

/// Builds a [`Bookmark`] from the first `<outline>` carrying an `xmlUrl`
/// attribute in each matched subtree.
///
/// The attributes may sit on the record root itself or on any outline
/// nested beneath it.
#[derive(Debug, Default)]
pub struct OutlineAccumulator {
    bookmark: Option<Bookmark>,
}

impl OutlineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Accumulator for OutlineAccumulator {
    type Record = Bookmark;

    fn visit(&mut self, mut element: ElementValue) {
        if element.name != "outline" || self.bookmark.is_some() {
            return;
        }
        let Some(xml_url) = element.attributes.remove("xmlUrl") else {
            return;
        };
        self.bookmark = Some(Bookmark {
            title: element
                .attributes
                .remove("title")
                .or_else(|| element.attributes.remove("text")),
            html_url: element.attributes.remove("htmlUrl"),
            kind: element.attributes.remove("type"),
            xml_url,
        });
    }

    fn can_produce(&self) -> bool {
        self.bookmark.is_some()
    }

    fn produce(&mut self) -> Bookmark {
        self.bookmark.take().unwrap_or_else(|| Bookmark {
            title: None,
            html_url: None,
            kind: None,
            xml_url: String::new(),
        })
    }

    fn reset(&mut self) {
        self.bookmark = None;
    }
}
