use std::{fmt, iter::FusedIterator};

use tracing::trace;

use crate::{
    error::{Error, Result},
    key::SliceBounds,
};

/// Anything that can hand out the value at a position, or say there is none.
///
/// `None` means "out of range"; a cursor treats it as the end of its pass.
pub trait Indexable {
    type Item;

    fn get_at(&self, index: usize) -> Option<Self::Item>;
}

impl<T: Clone> Indexable for [T] {
    type Item = T;

    fn get_at(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }
}

impl<T: Clone> Indexable for Vec<T> {
    type Item = T;

    fn get_at(&self, index: usize) -> Option<T> {
        self.as_slice().get_at(index)
    }
}

impl<S: Indexable + ?Sized> Indexable for &S {
    type Item = S::Item;

    fn get_at(&self, index: usize) -> Option<S::Item> {
        (**self).get_at(index)
    }
}

/// Forward-only, single-pass walk over an [`Indexable`] source.
///
/// A cursor owns nothing but its position: every value comes from `source`, so many cursors
/// over the same lazy list share its memo. Cursors can't be rewound and can't be indexed.
pub struct Cursor<'a, S: ?Sized> {
    source: &'a S,
    position: isize,
    stop: Option<isize>,
    step: isize,
    done: bool,
}

impl<'a, S: Indexable + ?Sized> Cursor<'a, S> {
    /// Starts at `bounds.start` (default 0) and moves by `bounds.step` (default 1) until
    /// `bounds.stop` is crossed or the source runs out.
    pub fn new(source: &'a S, bounds: SliceBounds) -> Result<Self> {
        let step = bounds.checked_step()?;
        let position = bounds.start.unwrap_or(0);
        if position < 0 {
            return Err(Error::invalid(format!(
                "cursor start must be non-negative, got {position}"
            )));
        }
        Ok(Self {
            source,
            position,
            stop: bounds.stop,
            step,
            done: false,
        })
    }

    /// The whole source, front to back.
    pub fn over(source: &'a S) -> Self {
        Self {
            source,
            position: 0,
            stop: None,
            step: 1,
            done: false,
        }
    }

    fn finish(&mut self) -> Result<S::Item> {
        trace!(position = self.position, "cursor done");
        self.done = true;
        Err(Error::Done)
    }

    /// Next value, or [`Error::Done`] once the stop is crossed or the source is out of range.
    pub fn advance(&mut self) -> Result<S::Item> {
        if self.done {
            return Err(Error::Done);
        }
        if let Some(stop) = self.stop {
            if (self.step > 0 && self.position >= stop) || (self.step < 0 && self.position <= stop) {
                return self.finish();
            }
        }
        if self.position < 0 {
            return self.finish();
        }
        let Some(item) = self.source.get_at(self.position as usize) else {
            return self.finish();
        };
        match self.position.checked_add(self.step) {
            Some(next) => self.position = next,
            None => self.done = true,
        }
        Ok(item)
    }

    /// Cursors are single pass; random access always fails.
    pub fn get(&self, _index: usize) -> Result<S::Item> {
        Err(Error::NotIndexable("Cursor"))
    }

    pub fn position(&self) -> isize {
        self.position
    }

    pub fn stop(&self) -> Option<isize> {
        self.stop
    }

    pub fn step(&self) -> isize {
        self.step
    }

    // positions left before the stop (or before 0, walking backwards)
    fn remaining_bound(&self) -> Option<usize> {
        if self.done {
            return Some(0);
        }
        let limit = match (self.stop, self.step > 0) {
            (Some(stop), true) => stop,
            (Some(stop), false) => stop.max(-1),
            (None, false) => -1,
            (None, true) => return None,
        };
        let ahead = if self.step > 0 { self.position < limit } else { limit < self.position };
        if !ahead {
            return Some(0);
        }
        Some((self.position.abs_diff(limit) - 1) / self.step.unsigned_abs() + 1)
    }
}

impl<S: Indexable + ?Sized> Iterator for Cursor<'_, S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        self.advance().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.remaining_bound())
    }
}

impl<S: Indexable + ?Sized> FusedIterator for Cursor<'_, S> {}

impl<S: ?Sized> fmt::Debug for Cursor<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("stop", &self.stop)
            .field("step", &self.step)
            .field("done", &self.done)
            .finish()
    }
}
