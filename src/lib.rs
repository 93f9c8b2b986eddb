//! Memoizing, lazily evaluated sequences over arbitrary (possibly endless) producers.
pub mod cursor;
pub mod error;
pub mod infra;
pub mod key;
pub mod list;
pub mod seq;

pub use cursor::{Cursor, Indexable};
pub use error::{Error, Result};
pub use key::{Access, Key, SliceBounds};
pub use list::{Item, LazyList, Slice};
