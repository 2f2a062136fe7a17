/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Lazy extraction of typed records from streamed XML.
//!
//! This crate turns the repeated substructures of a large document (the
//! `<item>`s of a feed, the `<book>`s of a catalogue) into a sequence of
//! records without ever building a tree of the whole document. Tokens are
//! read on demand through [`quick-xml`], and each request for the next
//! record resumes reading exactly where the previous one stopped.
//!
//! # Overview
//!
//! - [`PathSpec`]: the element path of a record root, e.g. `rss/channel/item`
//! - [`Accumulator`]: caller-supplied logic that turns the elements of one
//!   subtree into a record
//! - [`Records`]: the lazy record sequence
//! - [`RecordsBuilder`]: wires an input, a path and an accumulator together
//! - [`TokenSource`]: the token stream the engine consumes, with
//!   [`XmlTokenSource`] as the XML implementation
//!
//! # Example
//!
//! ```rust
//! use xml_records::{RecordsBuilder, TextAccumulator};
//!
//! let xml = r#"<n1>
//!   <l2>
//!     <i1 attrib="3">text1</i1>
//!     <i1 attrib="6"></i1>
//!     <i1 attrib="9">text3</i1>
//!   </l2>
//! </n1>"#;
//!
//! let texts: Vec<String> = RecordsBuilder::new()
//!     .from_text(xml)
//!     .path("n1/l2/i1")
//!     .accumulator(TextAccumulator::new())
//!     .build()
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! // The empty <i1> cannot produce a record and is skipped.
//! assert_eq!(texts, vec!["text1", "text3"]);
//! ```
//!
//! # How elements reach the accumulator
//!
//! Every element is delivered when its end tag is read, so the children of
//! a record root are visited before the root itself. Elements outside any
//! record are never visited. Once the record root has been visited the
//! accumulator is asked whether it can produce a record; if not, the
//! subtree is skipped and scanning continues with the next one.

pub mod accumulator;
pub mod accumulators;
pub mod builder;
pub mod driver;
pub mod element;
pub mod error;
pub mod path;
pub mod records;
pub mod stack;
pub mod token;

pub use accumulator::Accumulator;
pub use accumulators::{
    Bookmark, FieldRecord, FieldValue, FieldsAccumulator, OutlineAccumulator, RssItem,
    RssItemAccumulator, TextAccumulator,
};
pub use builder::RecordsBuilder;
pub use element::{ElementValue, TextMode};
pub use error::{Error, Result};
pub use path::PathSpec;
pub use records::Records;
pub use stack::{DepthClass, NodeStack, RootPredicate, Selection};
pub use token::{Token, TokenQueue, TokenSource, XmlTokenSource};
