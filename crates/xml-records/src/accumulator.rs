/*
 * accumulator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The accumulator capability that turns visited elements into records.

use crate::ElementValue;

/// Builds one record from the elements of a matched subtree.
///
/// For each record root the engine calls [`visit`](Accumulator::visit) for
/// every element of the subtree in document order (innermost elements close
/// first, the root itself is visited last). After the root has been visited
/// the engine asks [`can_produce`](Accumulator::can_produce); when it answers
/// true the engine calls [`produce`](Accumulator::produce) and then
/// [`reset`](Accumulator::reset).
///
/// When `can_produce` answers false the subtree is skipped and **no reset
/// happens**: whatever was gathered stays in the accumulator and the next
/// matched subtree is visited on top of it. Accumulators that must not leak
/// partial data between subtrees should clear their state when they see
/// the root element in `visit`, or keep every field optional and overwrite
/// it. Answering false is the intended way to reject malformed records
/// without failing the whole extraction.
pub trait Accumulator {
    type Record;

    /// Receive one completed element of the current subtree.
    fn visit(&mut self, element: ElementValue);

    /// Whether enough data has been gathered to build a record.
    fn can_produce(&self) -> bool;

    /// Build the record. Only called after `can_produce` returned true.
    fn produce(&mut self) -> Self::Record;

    /// Forget everything gathered for the record just produced.
    fn reset(&mut self);
}

impl<A: Accumulator + ?Sized> Accumulator for &mut A {
    type Record = A::Record;

    fn visit(&mut self, element: ElementValue) {
        (**self).visit(element)
    }

    fn can_produce(&self) -> bool {
        (**self).can_produce()
    }

    fn produce(&mut self) -> Self::Record {
        (**self).produce()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<A: Accumulator + ?Sized> Accumulator for Box<A> {
    type Record = A::Record;

    fn visit(&mut self, element: ElementValue) {
        (**self).visit(element)
    }

    fn can_produce(&self) -> bool {
        (**self).can_produce()
    }

    fn produce(&mut self) -> Self::Record {
        (**self).produce()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
