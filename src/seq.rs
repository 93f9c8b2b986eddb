//! Stock producers. Everything here is a plain `Iterator`; wrap it in a
//! [`LazyList`](crate::LazyList) to get memoized random access.
use std::{cell::Cell, iter::FusedIterator, ops::AddAssign, rc::Rc};

use num_traits::{CheckedAdd, CheckedMul, One, Zero};

/// 0, 1, 1, 2, 3, 5, ... ending at the last term that fits in `T`.
///
/// With `T = u128` that is F(186), 187 terms in all; pick a big integer type for an endless
/// sequence.
#[derive(Clone, Debug)]
pub struct Fibonacci<T> {
    cur: Option<T>,
    next: Option<T>,
}

impl<T: Zero + One> Fibonacci<T> {
    pub fn new() -> Self {
        Self::starting_at(T::zero(), T::one())
    }
}

impl<T: Zero + One> Default for Fibonacci<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Fibonacci<T> {
    /// Same recurrence from arbitrary seeds, e.g. (2, 1) for the Lucas numbers.
    pub fn starting_at(a: T, b: T) -> Self {
        Self {
            cur: Some(a),
            next: Some(b),
        }
    }
}

impl<T: CheckedAdd> Iterator for Fibonacci<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let out = self.cur.take()?;
        self.cur = self.next.take();
        if let Some(n) = &self.cur {
            self.next = out.checked_add(n);
        }
        Some(out)
    }
}

impl<T: CheckedAdd> FusedIterator for Fibonacci<T> {}

/// 0, 1, 4, 9, ... ending before the first square that overflows `T`.
#[derive(Clone, Debug)]
pub struct Squares<T> {
    n: Option<T>,
}

impl<T: Zero> Squares<T> {
    pub fn new() -> Self {
        Self { n: Some(T::zero()) }
    }
}

impl<T: Zero> Default for Squares<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + One + CheckedAdd + CheckedMul> Iterator for Squares<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let n = self.n.take()?;
        let sq = n.checked_mul(&n)?;
        self.n = n.checked_add(&T::one());
        Some(sq)
    }
}

/// Cumulative summation iterator adapter.
/// The summation is index-inclusive, i.e. the first output is the first input.
#[derive(Clone, Debug)]
pub struct Summatory<I, T> {
    src: I,
    sum: T,
}

impl<I, T> Summatory<I, T>
where
    T: Zero,
{
    pub fn new(src: I) -> Self {
        Self {
            src,
            sum: T::zero(),
        }
    }
}

impl<I, T> Iterator for Summatory<I, T>
where
    I: Iterator<Item = T>,
    T: Clone,
    for<'z> T: AddAssign<&'z T>,
{
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        self.src.next().map(|x| {
            self.sum += &x;
            self.sum.clone()
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.src.size_hint()
    }
}

/// 0, 1, 3, 6, 10, ...; endless, and says so through `size_hint`.
pub fn triangular() -> Summatory<std::ops::RangeFrom<u64>, u64> {
    Summatory::new(0u64..)
}

/// Counts calls to `next` on the wrapped producer, including the final `None`.
#[derive(Debug)]
pub struct Instrumented<I> {
    inner: I,
    pulls: Rc<Cell<usize>>,
}

impl<I: Iterator> Instrumented<I> {
    /// The producer plus a handle that keeps reading the count after the producer has been
    /// moved into a list.
    pub fn new<S: IntoIterator<IntoIter = I>>(src: S) -> (Self, Rc<Cell<usize>>) {
        let pulls = Rc::new(Cell::new(0));
        let me = Self {
            inner: src.into_iter(),
            pulls: Rc::clone(&pulls),
        };
        (me, pulls)
    }
}

impl<I: Iterator> Iterator for Instrumented<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.pulls.set(self.pulls.get() + 1);
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
