/*
 * builder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Assembles an input, a record selection and an accumulator into a
//! [`Records`] sequence.

use crate::path::DEFAULT_SEPARATOR;
use crate::records::Opener;
use crate::{
    Accumulator, Error, PathSpec, Records, Result, RootPredicate, Selection, TextMode,
    TokenSource, XmlTokenSource,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

enum Input<'a> {
    Text(&'a str),
    Reader(Box<dyn BufRead + 'a>),
    File(PathBuf),
    Tokens(Box<dyn TokenSource + 'a>),
}

enum PathInput {
    Text(String),
    Segments(Vec<String>),
}

/// Builder for [`Records`].
///
/// An input, an accumulator and exactly one of a path or a predicate are
/// required. Everything is validated by [`build`](RecordsBuilder::build);
/// the input itself is only opened when the first record is requested.
///
/// ```rust
/// use xml_records::{RecordsBuilder, TextAccumulator};
///
/// let titles: Vec<String> = RecordsBuilder::new()
///     .from_text("<rss><channel><item><title>One</title></item></channel></rss>")
///     .path("rss/channel/item")
///     .accumulator(TextAccumulator::new())
///     .build()
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(titles, vec!["One"]);
/// ```
pub struct RecordsBuilder<'a, A> {
    input: Option<Input<'a>>,
    path: Option<PathInput>,
    separator: char,
    predicate: Option<RootPredicate>,
    accumulator: Option<A>,
    text_mode: TextMode,
}

impl<A> Default for RecordsBuilder<'_, A> {
    fn default() -> Self {
        Self {
            input: None,
            path: None,
            separator: DEFAULT_SEPARATOR,
            predicate: None,
            accumulator: None,
            text_mode: TextMode::default(),
        }
    }
}

impl<'a, A: Accumulator> RecordsBuilder<'a, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the document from a string.
    pub fn from_text(mut self, xml: &'a str) -> Self {
        self.input = Some(Input::Text(xml));
        self
    }

    /// Read the document from any buffered reader.
    pub fn from_reader(mut self, reader: impl BufRead + 'a) -> Self {
        self.input = Some(Input::Reader(Box::new(reader)));
        self
    }

    /// Read the document from a file, opened on the first pull.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(Input::File(path.into()));
        self
    }

    /// Use an existing token source instead of the built-in XML tokenizer.
    pub fn from_tokens(mut self, source: impl TokenSource + 'a) -> Self {
        self.input = Some(Input::Tokens(Box::new(source)));
        self
    }

    /// Select record roots by path, e.g. `rss/channel/item`.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(PathInput::Text(path.into()));
        self
    }

    /// Select record roots by an already split path.
    pub fn path_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = Some(PathInput::Segments(
            segments.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Separator used when parsing a path given with [`path`](Self::path).
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Select record roots with a predicate over the open element names.
    ///
    /// The predicate also receives the attributes of the last name in the
    /// slice. Cannot be combined with a path.
    pub fn predicate(
        mut self,
        predicate: impl Fn(&[String], &HashMap<String, String>) -> bool + 'static,
    ) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn accumulator(mut self, accumulator: A) -> Self {
        self.accumulator = Some(accumulator);
        self
    }

    /// Whitespace handling for element text.
    pub fn text_mode(mut self, text_mode: TextMode) -> Self {
        self.text_mode = text_mode;
        self
    }

    /// Validate the configuration and create the record sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the input or accumulator is
    /// missing, when neither or both of a path and a predicate were given,
    /// or when the path has no element names.
    pub fn build(self) -> Result<Records<'a, A>> {
        let selection = match (self.path, self.predicate) {
            (Some(_), Some(_)) => {
                return Err(Error::configuration(
                    "specify either a path or a predicate, not both",
                ));
            }
            (None, None) => {
                return Err(Error::configuration("a path or a predicate is required"));
            }
            (Some(PathInput::Text(path)), None) => {
                Selection::Path(PathSpec::parse_with_separator(&path, self.separator)?)
            }
            (Some(PathInput::Segments(segments)), None) => {
                Selection::Path(PathSpec::from_segments(segments)?)
            }
            (None, Some(predicate)) => Selection::Predicate(predicate),
        };

        let accumulator = self
            .accumulator
            .ok_or_else(|| Error::configuration("an accumulator is required"))?;
        let input = self
            .input
            .ok_or_else(|| Error::configuration("an input document is required"))?;

        tracing::debug!(selection = ?selection, "record extraction configured");
        Ok(Records::deferred(
            opener(input),
            selection,
            accumulator,
            self.text_mode,
        ))
    }
}

fn opener<'a>(input: Input<'a>) -> Opener<'a> {
    match input {
        Input::Text(xml) => Box::new(move || -> Result<Box<dyn TokenSource + 'a>> {
            Ok(Box::new(XmlTokenSource::from_text(xml)))
        }),
        Input::Reader(reader) => Box::new(move || -> Result<Box<dyn TokenSource + 'a>> {
            Ok(Box::new(XmlTokenSource::from_reader(reader)))
        }),
        Input::File(path) => Box::new(move || -> Result<Box<dyn TokenSource + 'a>> {
            let file = File::open(&path).map_err(|err| {
                Error::Io(std::io::Error::new(
                    err.kind(),
                    format!("{}: {}", path.display(), err),
                ))
            })?;
            tracing::debug!(path = %path.display(), "opened input file");
            Ok(Box::new(XmlTokenSource::from_reader(BufReader::new(file))))
        }),
        Input::Tokens(source) => {
            Box::new(move || -> Result<Box<dyn TokenSource + 'a>> { Ok(source) })
        }
    }
}
