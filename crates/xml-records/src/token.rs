/*
 * token.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Token sources: the flat stream of start tags, end tags and text that
//! drives an extraction.

use crate::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::VecDeque;
use std::io::BufRead;

/// One parsing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An element opened. Attributes are `(name, value)` pairs in document order.
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// An element closed.
    End { name: String },
    /// Character data inside the innermost open element.
    Text(String),
    /// No more tokens. Returned again on every later call.
    EndDocument,
}

impl Token {
    pub fn start(name: impl Into<String>) -> Self {
        Token::Start {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// A start token with attributes, mostly for building streams by hand.
    pub fn start_with<I, N, V>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        Token::Start {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        Token::End { name: name.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Token::Text(text.into())
    }
}

/// Anything that can produce a [`Token`] stream.
///
/// Failures to read or parse the underlying document are returned as
/// errors and end the extraction.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token>;
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    fn next_token(&mut self) -> Result<Token> {
        (**self).next_token()
    }
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Result<Token> {
        (**self).next_token()
    }
}

/// A [`TokenSource`] reading XML through `quick-xml`.
///
/// Empty elements (`<a/>`) are reported as a start token followed by an end
/// token, CDATA sections as text, and entity references are unescaped.
/// Comments, processing instructions, the XML declaration and DOCTYPE are
/// skipped. Element and attribute names keep their prefixes.
///
/// Text is reported exactly as written, whitespace included; a comment or
/// CDATA section in the middle of some text splits it into several tokens.
pub struct XmlTokenSource<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    finished: bool,
}

impl<'a> XmlTokenSource<&'a [u8]> {
    /// Tokenize an in-memory document.
    pub fn from_text(content: &'a str) -> Self {
        Self::from_reader(content.as_bytes())
    }
}

impl<R: BufRead> XmlTokenSource<R> {
    pub fn from_reader(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.trim_text(false);

        Self {
            reader,
            buf: Vec::new(),
            finished: false,
        }
    }

    /// Byte offset of the reader in the input.
    pub fn position(&self) -> u64 {
        self.reader.buffer_position()
    }

    fn syntax_error(&self, message: String) -> Error {
        Error::TokenSource {
            message,
            position: Some(self.reader.error_position()),
        }
    }

    fn start_token(&self, e: &BytesStart<'_>) -> Result<Token> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| self.syntax_error(format!("Invalid attribute value: {}", err)))?;
            attributes.push((key, value.into_owned()));
        }

        Ok(Token::Start { name, attributes })
    }
}

impl<R: BufRead> TokenSource for XmlTokenSource<R> {
    fn next_token(&mut self) -> Result<Token> {
        if self.finished {
            return Ok(Token::EndDocument);
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(quick_xml::Error::Io(err)) => {
                    return Err(Error::Io(std::io::Error::new(err.kind(), err.to_string())));
                }
                Err(err) => {
                    return Err(Error::TokenSource {
                        message: err.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            };

            let token = match event {
                Event::Start(e) => {
                    let e = e.into_owned();
                    self.start_token(&e)?
                }
                Event::End(e) => Token::End {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                },
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::TokenSource {
                            message: format!("Invalid text content: {}", err),
                            position: Some(self.reader.buffer_position()),
                        })?
                        .into_owned();
                    if text.is_empty() {
                        continue;
                    }
                    Token::Text(text)
                }
                Event::CData(e) => Token::Text(String::from_utf8_lossy(e.as_ref()).into_owned()),
                Event::Empty(e) => {
                    // Not produced while empty elements are expanded.
                    let e = e.into_owned();
                    self.start_token(&e)?
                }
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => continue,
                Event::Eof => {
                    self.finished = true;
                    Token::EndDocument
                }
            };

            return Ok(token);
        }
    }
}

/// Replays a prepared list of tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenQueue {
    tokens: VecDeque<Token>,
}

impl TokenQueue {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl FromIterator<Token> for TokenQueue {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl TokenSource for TokenQueue {
    fn next_token(&mut self) -> Result<Token> {
        Ok(self.tokens.pop_front().unwrap_or(Token::EndDocument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &mut impl TokenSource) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = source.next_token().unwrap();
            if token == Token::EndDocument {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_basic_tokens() {
        let mut source = XmlTokenSource::from_text(r#"<a x="1"><b>hi</b></a>"#);
        assert_eq!(
            collect(&mut source),
            vec![
                Token::start_with("a", [("x", "1")]),
                Token::start("b"),
                Token::text("hi"),
                Token::end("b"),
                Token::end("a"),
            ]
        );
    }

    #[test]
    fn test_empty_element_expands() {
        let mut source = XmlTokenSource::from_text(r#"<a><b id="7"/></a>"#);
        assert_eq!(
            collect(&mut source),
            vec![
                Token::start("a"),
                Token::start_with("b", [("id", "7")]),
                Token::end("b"),
                Token::end("a"),
            ]
        );
    }

    #[test]
    fn test_skips_declarations_and_comments() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- note -->\n<a><?pi data?>x</a>";
        let mut source = XmlTokenSource::from_text(xml);
        assert_eq!(
            collect(&mut source),
            vec![
                Token::text("\n"),
                Token::text("\n"),
                Token::start("a"),
                Token::text("x"),
                Token::end("a"),
            ]
        );
    }

    #[test]
    fn test_unescapes_text_and_attributes() {
        let mut source =
            XmlTokenSource::from_text(r#"<a title="Fish &amp; Chips">1 &lt; 2</a>"#);
        assert_eq!(
            collect(&mut source),
            vec![
                Token::start_with("a", [("title", "Fish & Chips")]),
                Token::text("1 < 2"),
                Token::end("a"),
            ]
        );
    }

    #[test]
    fn test_cdata_is_text() {
        let mut source =
            XmlTokenSource::from_text("<d><![CDATA[<a href=\"x\">Comments</a>]]></d>");
        assert_eq!(
            collect(&mut source),
            vec![
                Token::start("d"),
                Token::text("<a href=\"x\">Comments</a>"),
                Token::end("d"),
            ]
        );
    }

    #[test]
    fn test_whitespace_is_reported_verbatim() {
        let mut source = XmlTokenSource::from_text("<a>\n<b> x </b></a>");
        assert_eq!(
            collect(&mut source),
            vec![
                Token::start("a"),
                Token::text("\n"),
                Token::start("b"),
                Token::text(" x "),
                Token::end("b"),
                Token::end("a"),
            ]
        );
    }

    #[test]
    fn test_comment_splits_text_without_trimming() {
        let mut source = XmlTokenSource::from_text("<b>Hello <!-- c --> world</b>");
        assert_eq!(
            collect(&mut source),
            vec![
                Token::start("b"),
                Token::text("Hello "),
                Token::text(" world"),
                Token::end("b"),
            ]
        );
    }

    #[test]
    fn test_prefixed_names_are_kept() {
        let mut source = XmlTokenSource::from_text(r#"<dc:creator xml:lang="en">K</dc:creator>"#);
        assert_eq!(
            collect(&mut source),
            vec![
                Token::start_with("dc:creator", [("xml:lang", "en")]),
                Token::text("K"),
                Token::end("dc:creator"),
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        let mut source = XmlTokenSource::from_text("");
        assert_eq!(source.next_token().unwrap(), Token::EndDocument);
        assert_eq!(source.next_token().unwrap(), Token::EndDocument);
    }

    #[test]
    fn test_mismatched_end_tag_is_token_source_error() {
        let mut source = XmlTokenSource::from_text("<a><b></a>");
        let err = loop {
            match source.next_token() {
                Ok(Token::EndDocument) => panic!("expected an error"),
                Ok(_) => {}
                Err(err) => break err,
            }
        };
        assert!(matches!(err, Error::TokenSource { .. }), "got {:?}", err);
    }

    #[test]
    fn test_position_advances() {
        let mut source = XmlTokenSource::from_text("<a>x</a>");
        assert_eq!(source.position(), 0);
        source.next_token().unwrap();
        assert_eq!(source.position(), 3);
    }

    #[test]
    fn test_token_queue_replays_then_ends() {
        let mut queue: TokenQueue = [Token::start("a"), Token::end("a")].into_iter().collect();
        assert_eq!(queue.remaining(), 2);
        assert_eq!(queue.next_token().unwrap(), Token::start("a"));
        assert_eq!(queue.next_token().unwrap(), Token::end("a"));
        assert_eq!(queue.next_token().unwrap(), Token::EndDocument);
        assert_eq!(queue.next_token().unwrap(), Token::EndDocument);
    }
}
