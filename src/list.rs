use std::{cell::RefCell, fmt, vec};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    cursor::{Cursor, Indexable},
    error::{Error, Result},
    key::{Access, Key, SliceBounds},
};

struct State<I: Iterator> {
    memo: Vec<I::Item>,
    producer: I,
    exhausted: bool,
}

impl<I: Iterator> State<I> {
    /// One value from the producer onto the end of the memo. False once the producer is done;
    /// a finished producer is never pulled again.
    fn pull(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.producer.next() {
            Some(x) => {
                trace!(position = self.memo.len(), "pulled");
                self.memo.push(x);
                true
            }
            None => {
                debug!(len = self.memo.len(), "producer exhausted");
                self.exhausted = true;
                false
            }
        }
    }

    /// Ensure at least `n` elements are cached. Returns false if the producer ends first.
    fn ensure_len(&mut self, n: usize) -> bool {
        while self.memo.len() < n {
            if !self.pull() {
                return false;
            }
        }
        true
    }

    /// Pull everything. Never returns for an endless producer, unless it says so up front.
    fn drain(&mut self) -> Result<()> {
        if self.exhausted {
            return Ok(());
        }
        if self.producer.size_hint() == (usize::MAX, None) {
            return Err(Error::Unbounded);
        }
        debug!(realized = self.memo.len(), "draining producer");
        while self.pull() {}
        Ok(())
    }
}

/// A memoizing view over a possibly endless producer.
///
/// Values are pulled on first demand and kept, so `memo[i]` is always the i-th value the
/// producer yielded and each position is computed at most once. Indexing at or past the
/// realized prefix pulls exactly as far as needed; slicing with non-negative bounds hands back
/// a [`Cursor`] and pulls nothing. Negative indices, negative slice bounds and [`len`] need the
/// whole producer and so never finish on an endless one (unless the producer reports itself as
/// endless through `size_hint`, in which case they fail with [`Error::Unbounded`]).
///
/// The list is used through `&self` so any number of cursors can walk it at once; values are
/// handed out by clone. A producer must not index the list it is feeding.
///
/// [`len`]: LazyList::len
pub struct LazyList<I: Iterator> {
    state: RefCell<State<I>>,
}

/// A slice of a lazy list: a cursor when it could be served lazily, otherwise the
/// materialized values.
pub enum Slice<'a, I: Iterator> {
    Lazy(Cursor<'a, LazyList<I>>),
    Eager(vec::IntoIter<I::Item>),
}

/// Result of a [`Key`] lookup.
pub enum Item<'a, I: Iterator> {
    Value(I::Item),
    Slice(Slice<'a, I>),
}

impl<I: Iterator> LazyList<I> {
    pub fn new<S: IntoIterator<IntoIter = I>>(src: S) -> Self {
        Self::with_capacity(src, 0)
    }

    /// Like `new`, with room for `cap` values before the memo reallocates.
    pub fn with_capacity<S: IntoIterator<IntoIter = I>>(src: S, cap: usize) -> Self {
        Self {
            state: RefCell::new(State {
                memo: Vec::with_capacity(cap),
                producer: src.into_iter(),
                exhausted: false,
            }),
        }
    }

    /// Number of values pulled so far. Never pulls.
    pub fn realized(&self) -> usize {
        self.state.borrow().memo.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.borrow().exhausted
    }

    /// Full length. Drains the producer.
    pub fn len(&self) -> Result<usize> {
        let mut st = self.state.borrow_mut();
        st.drain()?;
        Ok(st.memo.len())
    }

    /// False iff the producer yields at least one value. Pulls at most once.
    pub fn is_empty(&self) -> bool {
        !self.state.borrow_mut().ensure_len(1)
    }

    /// The realized prefix as it stands, without pulling.
    pub fn into_cached(self) -> Vec<I::Item> {
        self.state.into_inner().memo
    }
}

impl<I: Iterator> LazyList<I>
where
    I::Item: Clone,
{
    /// Value at `index`, pulling from the producer until it is reached.
    pub fn get(&self, index: usize) -> Result<I::Item> {
        let mut st = self.state.borrow_mut();
        if st.ensure_len(index.saturating_add(1)) {
            Ok(st.memo[index].clone())
        } else {
            Err(Error::OutOfRange {
                index: isize::try_from(index).unwrap_or(isize::MAX),
            })
        }
    }

    /// Signed indexing. Negative indices count back from the end, which drains the producer.
    pub fn at(&self, index: isize) -> Result<I::Item> {
        if index >= 0 {
            return self.get(index as usize);
        }
        let mut st = self.state.borrow_mut();
        st.drain()?;
        index
            .checked_add_unsigned(st.memo.len())
            .filter(|&i| i >= 0)
            .map(|i| st.memo[i as usize].clone())
            .ok_or(Error::OutOfRange { index })
    }

    /// A cursor over `bounds`. Pulls nothing; negative start or stop is rejected since it
    /// can't be resolved without draining.
    pub fn slice_lazy(&self, bounds: impl Into<SliceBounds>) -> Result<Cursor<'_, Self>> {
        let bounds = bounds.into();
        if bounds.is_negative() {
            return Err(Error::invalid(format!(
                "slice `{bounds}` has a negative bound and can't be taken lazily"
            )));
        }
        Cursor::new(self, bounds)
    }

    /// Drains the producer and slices the materialized values. A zero step is rejected
    /// before anything is pulled.
    pub fn slice_eager(&self, bounds: impl Into<SliceBounds>) -> Result<Vec<I::Item>> {
        let bounds = bounds.into();
        bounds.checked_step()?;
        let mut st = self.state.borrow_mut();
        st.drain()?;
        bounds.apply(&st.memo)
    }

    /// Lazy when every present bound is non-negative, eager otherwise.
    pub fn slice(&self, bounds: impl Into<SliceBounds>) -> Result<Slice<'_, I>> {
        let bounds = bounds.into();
        if bounds.is_negative() {
            Ok(Slice::Eager(self.slice_eager(bounds)?.into_iter()))
        } else {
            self.slice_lazy(bounds).map(Slice::Lazy)
        }
    }

    /// Dispatches on the shape of `key`: single values by index, slices lazily or eagerly.
    pub fn lookup(&self, key: impl Into<Key>) -> Result<Item<'_, I>> {
        match key.into().classify() {
            Access::Get(i) => self.get(i).map(Item::Value),
            Access::FromEnd(i) => self.at(i).map(Item::Value),
            Access::SliceLazy(b) => self.slice_lazy(b).map(|c| Item::Slice(Slice::Lazy(c))),
            Access::SliceEager(b) => self
                .slice_eager(b)
                .map(|v| Item::Slice(Slice::Eager(v.into_iter()))),
        }
    }

    pub fn iter(&self) -> Cursor<'_, Self> {
        Cursor::over(self)
    }

    /// Copy of the realized prefix, without pulling.
    pub fn cached(&self) -> Vec<I::Item> {
        self.state.borrow().memo.clone()
    }
}

impl<I: Iterator> From<I> for LazyList<I> {
    fn from(src: I) -> Self {
        Self::new(src)
    }
}

impl<I: Iterator> Indexable for LazyList<I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn get_at(&self, index: usize) -> Option<I::Item> {
        self.get(index).ok()
    }
}

impl<'a, I: Iterator> IntoIterator for &'a LazyList<I>
where
    I::Item: Clone,
{
    type Item = I::Item;
    type IntoIter = Cursor<'a, LazyList<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I: Iterator> Iterator for Slice<'_, I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        match self {
            Slice::Lazy(c) => c.next(),
            Slice::Eager(v) => v.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Slice::Lazy(c) => c.size_hint(),
            Slice::Eager(v) => v.size_hint(),
        }
    }
}

impl<I: Iterator> Slice<'_, I> {
    pub fn is_lazy(&self) -> bool {
        matches!(self, Slice::Lazy(_))
    }
}

impl<'a, I: Iterator> Item<'a, I> {
    pub fn value(self) -> Option<I::Item> {
        match self {
            Item::Value(v) => Some(v),
            Item::Slice(_) => None,
        }
    }

    pub fn slice(self) -> Option<Slice<'a, I>> {
        match self {
            Item::Value(_) => None,
            Item::Slice(s) => Some(s),
        }
    }
}

impl<I: Iterator> fmt::Debug for LazyList<I>
where
    I::Item: fmt::Debug,
{
    /// `LazyList([..])` once exhausted, `LazyList(<producer>)` before the first pull,
    /// `LazyList([a, b... ] + <producer>)` in between.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(st) = self.state.try_borrow() else {
            return f.write_str("LazyList(<in use>)");
        };
        let producer = std::any::type_name::<I>();
        if st.exhausted {
            write!(f, "LazyList({:?})", st.memo)
        } else if st.memo.is_empty() {
            write!(f, "LazyList(<{producer}>)")
        } else {
            let prefix = st.memo.iter().map(|x| format!("{x:?}")).join(", ");
            write!(f, "LazyList([{prefix}... ] + <{producer}>)")
        }
    }
}
