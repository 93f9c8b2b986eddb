use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed key, zero step, or a bound the operation can't accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The producer finished before reaching `index`.
    #[error("lazy-list index {index} out of range")]
    OutOfRange { index: isize },

    /// Normal end of a cursor pass.
    #[error("iteration done")]
    Done,

    #[error("'{0}' object does not support indexing")]
    NotIndexable(&'static str),

    /// A full drain was requested on a producer that declares itself endless.
    #[error("operation requires a finite producer, but the producer never ends")]
    Unbounded,
}

impl Error {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}
