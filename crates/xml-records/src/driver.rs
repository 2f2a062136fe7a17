/*
 * driver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The extraction driver: consumes tokens, assembles elements, classifies
//! them and decides when a record is complete.

use crate::element::ElementFrame;
use crate::{
    Accumulator, DepthClass, Error, NodeStack, Result, Selection, TextMode, Token, TokenSource,
};

/// Outcome of feeding one token to a [`Traversal`].
#[derive(Debug, PartialEq, Eq)]
pub enum Step<T> {
    /// Keep reading tokens.
    Continue,
    /// A record root closed and the accumulator produced a record.
    Record(T),
    /// A record root closed but the accumulator could not produce.
    Skipped,
    /// The document ended.
    Finished,
}

/// State of one pass over a document.
///
/// Open element names and attributes live in the node stack; their text
/// lives in a parallel stack of frames.
#[derive(Debug, Default)]
pub struct Traversal {
    stack: NodeStack,
    frames: Vec<ElementFrame>,
    text_mode: TextMode,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stack(&self) -> &NodeStack {
        &self.stack
    }

    /// Feed one token.
    pub fn advance<A: Accumulator>(
        &mut self,
        token: Token,
        selection: &Selection,
        accumulator: &mut A,
    ) -> Result<Step<A::Record>> {
        match token {
            Token::Start { name, attributes } => {
                if let Some(parent) = self.frames.last_mut() {
                    parent.break_text_run();
                }
                // Later duplicates overwrite earlier ones.
                self.stack.push_element(name, attributes.into_iter().collect());
                self.frames.push(ElementFrame::default());
                Ok(Step::Continue)
            }
            Token::Text(text) => {
                // Text outside the document element has nowhere to go.
                if let Some(frame) = self.frames.last_mut() {
                    frame.push_text(&text);
                }
                Ok(Step::Continue)
            }
            Token::End { name } => {
                let class = selection.classify(&self.stack);
                let (name, attributes) = self.stack.pop_element(&name)?;
                let element = self
                    .frames
                    .pop()
                    .unwrap_or_default()
                    .close(name, attributes, self.text_mode);

                if !class.is_visited() {
                    return Ok(Step::Continue);
                }
                accumulator.visit(element);
                if class != DepthClass::AtRoot {
                    return Ok(Step::Continue);
                }

                if accumulator.can_produce() {
                    let record = accumulator.produce();
                    accumulator.reset();
                    Ok(Step::Record(record))
                } else {
                    Ok(Step::Skipped)
                }
            }
            Token::EndDocument => match self.stack.top() {
                Some(open) => Err(Error::UnclosedElement {
                    name: open.to_string(),
                }),
                None => Ok(Step::Finished),
            },
        }
    }
}

/// Drives a [`Traversal`] from a token source until a record is ready.
#[derive(Debug)]
pub struct Extractor<A> {
    selection: Selection,
    accumulator: A,
    traversal: Traversal,
    produced: usize,
    skipped: usize,
}

impl<A: Accumulator> Extractor<A> {
    pub fn new(selection: Selection, accumulator: A) -> Self {
        Self {
            selection,
            accumulator,
            traversal: Traversal::new(),
            produced: 0,
            skipped: 0,
        }
    }

    /// Apply `text_mode` to element text.
    pub fn with_text_mode(mut self, text_mode: TextMode) -> Self {
        self.traversal.text_mode = text_mode;
        self
    }

    /// Read tokens until the next record or the end of the document.
    ///
    /// Returns `Ok(None)` once the document has ended.
    pub fn pull<S: TokenSource + ?Sized>(&mut self, source: &mut S) -> Result<Option<A::Record>> {
        loop {
            let token = source.next_token()?;
            match self
                .traversal
                .advance(token, &self.selection, &mut self.accumulator)?
            {
                Step::Continue => {}
                Step::Record(record) => {
                    self.produced += 1;
                    tracing::trace!(produced = self.produced, "record extracted");
                    return Ok(Some(record));
                }
                Step::Skipped => {
                    self.skipped += 1;
                    tracing::trace!(
                        skipped = self.skipped,
                        "accumulator could not produce, skipping subtree"
                    );
                }
                Step::Finished => return Ok(None),
            }
        }
    }

    /// Records produced so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Record roots skipped because the accumulator could not produce.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn accumulator(&self) -> &A {
        &self.accumulator
    }

    pub fn into_accumulator(self) -> A {
        self.accumulator
    }
}
