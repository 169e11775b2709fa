#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub use indexmap;
pub use indexmap::IndexMap;

pub mod cursor;
pub mod enumerate;
pub mod error;
pub mod filter;
pub mod flat_map;
pub mod grouped;
mod key_table;
pub mod map;
mod materialize;
pub mod reduced;
pub mod skip;
pub mod source;
pub mod take;
pub mod unique;

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod stream;

pub use cursor::Cursor;
pub use error::{BoxError, Error};
pub use grouped::Grouped;
pub use reduced::Reduced;
pub use source::{FnSource, IterSource};
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub use stream::{AsyncCursor, AsyncGrouped};

/// The pull protocol shared by every cursor, source and adaptor in this crate.
///
/// Unlike [`Iterator`], a `Pull` can be told to release its resources early with
/// [`Pull::close`], and can have an error injected at its current position with
/// [`Pull::throw`]. Adaptors forward both calls to their upstream, so closing the last
/// stage of a chain releases the source.
pub trait Pull {
    /// The pulled item type.
    type Item;

    /// Pulls the next item, or `None` once the source is exhausted.
    fn pull(&mut self) -> Option<Self::Item>;

    /// Stops the cursor early. Sources drop their underlying iterator and return `None`
    /// from then on.
    fn close(&mut self) {}

    /// Injects `error` at the current position.
    ///
    /// A source which can recover returns the next item (or `None`), otherwise the error is
    /// handed back unchanged.
    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        Err(error)
    }
}

impl<P> Pull for &mut P
where
    P: Pull + ?Sized,
{
    type Item = P::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        (**self).pull()
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        (**self).throw(error)
    }
}

impl<P> Pull for Box<P>
where
    P: Pull + ?Sized,
{
    type Item = P::Item;

    fn pull(&mut self) -> Option<Self::Item> {
        (**self).pull()
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn throw(&mut self, error: Error) -> Result<Option<Self::Item>, Error> {
        (**self).throw(error)
    }
}

/// Forwards [`Pull::close`] to `self.source`.
macro_rules! forward_close {
    () => {
        fn close(&mut self) {
            self.source.close();
        }
    };
}
use forward_close;
