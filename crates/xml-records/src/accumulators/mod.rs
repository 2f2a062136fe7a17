/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Ready-made accumulators.
//!
//! - [`TextAccumulator`]: the text of a record's subtree
//! - [`FieldsAccumulator`]: a flat map of element texts, for any document
//! - [`RssItemAccumulator`]: items of an RSS 2.0 feed
//! - [`OutlineAccumulator`]: feed bookmarks from an OPML outline

mod fields;
mod opml;
mod rss;
mod text;

pub use fields::{FieldRecord, FieldValue, FieldsAccumulator};
pub use opml::{Bookmark, OutlineAccumulator};
pub use rss::{RssItem, RssItemAccumulator};
pub use text::TextAccumulator;
