//! Keys for looking things up in a lazy list, and the pure classification step that decides
//! whether a lookup can be served lazily or needs the whole producer drained first.
//!
//! Negative offsets only mean something relative to the end of a sequence, and the end of a
//! lazy sequence is unknown until the producer has finished. Anything touching a negative
//! start or stop therefore takes the eager path.
use std::{
    fmt,
    ops::{Range, RangeFrom, RangeFull, RangeTo},
    str::FromStr,
};

use crate::error::{Error, Result};

#[inline]
fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

/// `start:stop:step`, each part optional. Step defaults to 1 and start to the
/// beginning (or the end, for negative steps).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SliceBounds {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceBounds {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// True when a bound can only be resolved against the full length.
    pub fn is_negative(&self) -> bool {
        self.start.is_some_and(|s| s < 0) || self.stop.is_some_and(|s| s < 0)
    }

    /// The step, defaulting to 1. Zero is rejected.
    pub fn checked_step(&self) -> Result<isize> {
        match self.step.unwrap_or(1) {
            0 => Err(Error::invalid("slice step cannot be zero")),
            step => Ok(step),
        }
    }

    /// Resolves the bounds against a sequence of length `len`, clamping the way Python's
    /// `slice.indices` does. Returns `(start, stop, step)`; `start` and `stop` may be -1 when
    /// walking backwards past the front.
    pub fn indices(&self, len: usize) -> Result<(isize, isize, isize)> {
        let len = signed(len);
        let step = self.checked_step()?;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = self
            .start
            .map(clamp)
            .unwrap_or(if step < 0 { upper } else { lower });
        let stop = self
            .stop
            .map(clamp)
            .unwrap_or(if step < 0 { lower } else { upper });
        Ok((start, stop, step))
    }

    /// Number of positions `indices(len)` walks over.
    pub fn slice_len(&self, len: usize) -> Result<usize> {
        let (start, stop, step) = self.indices(len)?;
        let ahead = if step > 0 { start < stop } else { stop < start };
        if !ahead {
            return Ok(0);
        }
        Ok((start.abs_diff(stop) - 1) / step.unsigned_abs() + 1)
    }

    /// Ordinary (eager) slicing of a materialized sequence.
    pub fn apply<T: Clone>(&self, data: &[T]) -> Result<Vec<T>> {
        let (start, _, step) = self.indices(data.len())?;
        let n = self.slice_len(data.len())?;
        Ok((0..n)
            .map(|k| data[(start + signed(k) * step) as usize].clone())
            .collect())
    }
}

impl From<Range<usize>> for SliceBounds {
    fn from(r: Range<usize>) -> Self {
        Self::new(Some(signed(r.start)), Some(signed(r.end)), None)
    }
}

impl From<RangeFrom<usize>> for SliceBounds {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::new(Some(signed(r.start)), None, None)
    }
}

impl From<RangeTo<usize>> for SliceBounds {
    fn from(r: RangeTo<usize>) -> Self {
        Self::new(None, Some(signed(r.end)), None)
    }
}

impl From<RangeFull> for SliceBounds {
    fn from(_: RangeFull) -> Self {
        Self::default()
    }
}

impl fmt::Display for SliceBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |b: Option<isize>| b.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "{}:{}", part(self.start), part(self.stop))?;
        if let Some(step) = self.step {
            write!(f, ":{step}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Index(isize),
    Slice(SliceBounds),
}

/// What a key asks of the list, decided before anything is pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Pull up to and including this position.
    Get(usize),
    /// Drain, then count back from the end.
    FromEnd(isize),
    /// Hand out a cursor; no pulls.
    SliceLazy(SliceBounds),
    /// Drain, then slice the materialized values.
    SliceEager(SliceBounds),
}

impl Key {
    pub fn classify(&self) -> Access {
        match *self {
            Key::Index(i) if i >= 0 => Access::Get(i as usize),
            Key::Index(i) => Access::FromEnd(i),
            Key::Slice(b) if b.is_negative() => Access::SliceEager(b),
            Key::Slice(b) => Access::SliceLazy(b),
        }
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(signed(i))
    }
}

impl From<isize> for Key {
    fn from(i: isize) -> Self {
        Key::Index(i)
    }
}

impl From<SliceBounds> for Key {
    fn from(b: SliceBounds) -> Self {
        Key::Slice(b)
    }
}

macro_rules! key_from_range {
    ($($r:ty),*) => {
        $(
            impl From<$r> for Key {
                fn from(r: $r) -> Self {
                    Key::Slice(r.into())
                }
            }
        )*
    };
}

key_from_range!(Range<usize>, RangeFrom<usize>, RangeTo<usize>, RangeFull);

impl FromStr for Key {
    type Err = Error;

    /// Python subscript syntax: `10`, `-7`, `3:7`, `:5`, `10:`, `::2`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        match parts.as_slice() {
            [index] => index
                .parse()
                .map(Key::Index)
                .map_err(|_| Error::invalid(format!("lazy-list key must be an integer or a slice, got `{s}`"))),
            [start, stop] => Ok(Key::Slice(SliceBounds::new(bound(start)?, bound(stop)?, None))),
            [start, stop, step] => Ok(Key::Slice(SliceBounds::new(
                bound(start)?,
                bound(stop)?,
                bound(step)?,
            ))),
            _ => Err(Error::invalid(format!("too many colons in slice `{s}`"))),
        }
    }
}

fn bound(part: &str) -> Result<Option<isize>> {
    if part.is_empty() {
        return Ok(None);
    }
    part.parse()
        .map(Some)
        .map_err(|_| Error::invalid(format!("lazy-list slice indices must be integers, got `{part}`")))
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Slice(b) => write!(f, "{b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Key {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(key("10"), Key::Index(10));
        assert_eq!(key(" -7 "), Key::Index(-7));
        assert_eq!(key("3:7"), Key::Slice(SliceBounds::new(Some(3), Some(7), None)));
        assert_eq!(key(":5"), Key::Slice(SliceBounds::new(None, Some(5), None)));
        assert_eq!(key("10:"), Key::Slice(SliceBounds::new(Some(10), None, None)));
        assert_eq!(key("::2"), Key::Slice(SliceBounds::new(None, None, Some(2))));
        assert_eq!(key("5:-1"), Key::Slice(SliceBounds::new(Some(5), Some(-1), None)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "x", "1.5", "a:3", "1:b", "1:2:c", "1:2:3:4"] {
            let err = bad.parse::<Key>().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{bad}: {err:?}");
        }
    }

    #[test]
    fn test_display_round_trips_parse() {
        for s in ["10", "-7", "3:7", ":5", "10:", "::2", "5:-1:-2"] {
            assert_eq!(key(s).to_string(), s);
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(key("4").classify(), Access::Get(4));
        assert_eq!(key("-1").classify(), Access::FromEnd(-1));
        assert!(matches!(key("3:7").classify(), Access::SliceLazy(_)));
        assert!(matches!(key("10::-1").classify(), Access::SliceLazy(_)));
        assert!(matches!(key("-3:").classify(), Access::SliceEager(_)));
        assert!(matches!(key(":-1").classify(), Access::SliceEager(_)));
    }

    #[test]
    fn test_ranges_convert() {
        assert_eq!(Key::from(3..7), key("3:7"));
        assert_eq!(Key::from(10..), key("10:"));
        assert_eq!(Key::from(..5), key(":5"));
        assert_eq!(Key::from(..), key(":"));
        assert_eq!(Key::from(2usize), Key::Index(2));
    }

    #[test]
    fn test_apply_matches_python() {
        let v: Vec<i32> = (0..10).collect();
        let s = |st, sp, stp| SliceBounds::new(st, sp, stp).apply(&v).unwrap();
        // v[5:-1]
        assert_eq!(s(Some(5), Some(-1), None), vec![5, 6, 7, 8]);
        // v[-3:]
        assert_eq!(s(Some(-3), None, None), vec![7, 8, 9]);
        // v[::-3]
        assert_eq!(s(None, None, Some(-3)), vec![9, 6, 3, 0]);
        // v[-2:-8:-2]
        assert_eq!(s(Some(-2), Some(-8), Some(-2)), vec![8, 6, 4]);
        // v[-100:3]
        assert_eq!(s(Some(-100), Some(3), None), vec![0, 1, 2]);
        // v[8:100]
        assert_eq!(s(Some(8), Some(100), None), vec![8, 9]);
        // v[3:-100:-1]
        assert_eq!(s(Some(3), Some(-100), Some(-1)), vec![3, 2, 1, 0]);
        // v[-1:-5]
        assert_eq!(s(Some(-1), Some(-5), None), Vec::<i32>::new());
    }

    #[test]
    fn test_apply_empty_and_zero_step() {
        let empty: [u8; 0] = [];
        assert!(SliceBounds::new(Some(-1), None, None).apply(&empty).unwrap().is_empty());
        assert!(SliceBounds::default().with_step(-1).apply(&empty).unwrap().is_empty());
        assert!(matches!(
            SliceBounds::default().with_step(0).apply(&[1]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_apply_extreme_step() {
        let v: Vec<i32> = (0..10).collect();
        // v[-1::isize::MIN] and v[::isize::MAX]
        let back = SliceBounds::new(Some(-1), None, Some(isize::MIN));
        assert_eq!(back.slice_len(v.len()), Ok(1));
        assert_eq!(back.apply(&v).unwrap(), vec![9]);
        assert_eq!(SliceBounds::default().with_step(isize::MAX).apply(&v).unwrap(), vec![0]);
        assert_eq!(
            key("-1::-9223372036854775808"),
            Key::Slice(SliceBounds::new(Some(-1), None, Some(isize::MIN)))
        );
    }
}
