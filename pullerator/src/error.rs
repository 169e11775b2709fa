//! [`Error`] and related items.

/// A boxed error, as thrown into a cursor with [`Pull::throw`](crate::Pull::throw).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by cursor terminals and the cursor protocol.
///
/// Errors from user callbacks are never caught by this crate, they unwind (or, for
/// [`Cursor::try_for_each`](crate::Cursor::try_for_each), return) straight through the
/// operation that triggered them.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// `reduce` was called on an empty source without an initial value.
    #[error("reduce of an empty cursor with no initial value")]
    EmptyReduce,
    /// An error thrown into a cursor which the source did not recover from.
    #[error("error thrown into cursor: {0}")]
    Thrown(#[source] BoxError),
    /// A grouped value could not be converted into JSON by `to_object`.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[error("failed to serialize grouped values: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Wraps any error so it can be thrown into a cursor.
    pub fn thrown(error: impl Into<BoxError>) -> Self {
        Self::Thrown(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrown_display() {
        let error = Error::thrown("boom");
        assert_eq!("error thrown into cursor: boom", error.to_string());
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_empty_reduce_display() {
        assert_eq!(
            "reduce of an empty cursor with no initial value",
            Error::EmptyReduce.to_string()
        );
    }
}
