/*
 * records.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The lazy, pull-based record sequence.

use crate::driver::Extractor;
use crate::{Accumulator, Error, Result, Selection, TextMode, TokenSource};
use std::iter::FusedIterator;

/// Opens the token source on first use.
pub(crate) type Opener<'a> = Box<dyn FnOnce() -> Result<Box<dyn TokenSource + 'a>> + 'a>;

enum SourceSlot<'a> {
    /// Not opened yet.
    Pending(Opener<'a>),
    Open(Box<dyn TokenSource + 'a>),
    /// Exhausted, failed or closed. The source has been dropped.
    Released,
}

/// A forward-only sequence of records extracted from one document.
///
/// Each pull resumes reading exactly where the previous one stopped. The
/// token source is opened on the first pull and dropped as soon as the
/// document is exhausted, a fatal error occurs, [`close`](Records::close)
/// is called, or the sequence itself is dropped.
///
/// Besides [`Iterator`], the explicit peek protocol is available:
///
/// ```rust
/// use xml_records::{RecordsBuilder, TextAccumulator};
///
/// let mut records = RecordsBuilder::new()
///     .from_text("<a><b>x</b><b>y</b></a>")
///     .path("a/b")
///     .accumulator(TextAccumulator::new())
///     .build()
///     .unwrap();
///
/// let mut values = Vec::new();
/// while records.has_next().unwrap() {
///     values.push(records.next_record().unwrap());
/// }
/// assert_eq!(values, vec!["x", "y"]);
/// ```
pub struct Records<'a, A: Accumulator> {
    source: SourceSlot<'a>,
    extractor: Extractor<A>,
    buffered: Option<A::Record>,
}

impl<'a, A: Accumulator> Records<'a, A> {
    /// Extract records from an already open token source.
    pub fn new(source: impl TokenSource + 'a, selection: Selection, accumulator: A) -> Self {
        Self {
            source: SourceSlot::Open(Box::new(source)),
            extractor: Extractor::new(selection, accumulator),
            buffered: None,
        }
    }

    pub(crate) fn deferred(
        opener: Opener<'a>,
        selection: Selection,
        accumulator: A,
        text_mode: TextMode,
    ) -> Self {
        Self {
            source: SourceSlot::Pending(opener),
            extractor: Extractor::new(selection, accumulator).with_text_mode(text_mode),
            buffered: None,
        }
    }

    /// Apply `text_mode` to element text instead of trimming it.
    pub fn with_text_mode(mut self, text_mode: TextMode) -> Self {
        self.extractor = self.extractor.with_text_mode(text_mode);
        self
    }

    /// Whether another record is available, reading ahead to find it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceProtocol`] when a record found by a previous
    /// call has not been taken with [`next_record`](Records::next_record)
    /// yet, and propagates token source and structural errors.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.buffered.is_some() {
            return Err(Error::protocol(
                "has_next called again before the buffered record was taken",
            ));
        }

        match self.fetch()? {
            Some(record) => {
                self.buffered = Some(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Take the next record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceProtocol`] when the sequence is exhausted.
    pub fn next_record(&mut self) -> Result<A::Record> {
        if let Some(record) = self.buffered.take() {
            return Ok(record);
        }

        self.fetch()?
            .ok_or_else(|| Error::protocol("no more records in the document"))
    }

    /// Stop early and release the token source.
    ///
    /// A record found by `has_next` but not yet taken is discarded.
    pub fn close(&mut self) {
        self.buffered = None;
        self.release();
    }

    /// True once the token source has been dropped.
    pub fn is_released(&self) -> bool {
        matches!(self.source, SourceSlot::Released)
    }

    /// Records produced so far.
    pub fn produced(&self) -> usize {
        self.extractor.produced()
    }

    /// Record roots skipped because the accumulator could not produce.
    pub fn skipped(&self) -> usize {
        self.extractor.skipped()
    }

    pub fn accumulator(&self) -> &A {
        self.extractor.accumulator()
    }

    /// Give the accumulator back, dropping the token source.
    pub fn into_accumulator(self) -> A {
        self.extractor.into_accumulator()
    }

    fn fetch(&mut self) -> Result<Option<A::Record>> {
        let result = self.pull_from_source();
        match &result {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => self.release(),
        }
        result
    }

    fn pull_from_source(&mut self) -> Result<Option<A::Record>> {
        if matches!(self.source, SourceSlot::Pending(_)) {
            if let SourceSlot::Pending(open) =
                std::mem::replace(&mut self.source, SourceSlot::Released)
            {
                tracing::debug!("opening token source");
                self.source = SourceSlot::Open(open()?);
            }
        }

        match &mut self.source {
            SourceSlot::Open(source) => self.extractor.pull(source.as_mut()),
            SourceSlot::Pending(_) | SourceSlot::Released => Ok(None),
        }
    }

    fn release(&mut self) {
        if let SourceSlot::Released = self.source {
            return;
        }
        self.source = SourceSlot::Released;
        tracing::debug!(
            produced = self.extractor.produced(),
            skipped = self.extractor.skipped(),
            "token source released"
        );
    }
}

impl<A: Accumulator> Iterator for Records<'_, A> {
    type Item = Result<A::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.buffered.take() {
            return Some(Ok(record));
        }

        self.fetch().transpose()
    }
}

impl<A: Accumulator> FusedIterator for Records<'_, A> {}

impl<A: Accumulator> std::fmt::Debug for Records<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.source {
            SourceSlot::Pending(_) => "pending",
            SourceSlot::Open(_) => "open",
            SourceSlot::Released => "released",
        };
        f.debug_struct("Records")
            .field("source", &state)
            .field("buffered", &self.buffered.is_some())
            .field("produced", &self.produced())
            .finish()
    }
}
