//! The streaming object pipeline: readers produce a lazy, finite
//! sequence of owned objects, writers consume them one at a time.
//!
//! A writer MUST be flushed explicitly on the success path. `flush` is
//! the transition to a terminal state: it finalizes format-level
//! framing (trailer records, index tables, padding), and calling it a
//! second time fails with [`LkError::AlreadyFlushed`] instead of
//! emitting trailing bytes twice. Dropping a writer never re-flushes.
use crate::errors::LkError;

/// Produces a lazy, finite sequence of owned objects. Exhaustion
/// (`None`) is distinct from an error.
pub trait ObjectReader<T> {
    fn next(&mut self) -> Option<Result<T, LkError>>;
}

/// Accepts objects one at a time.
pub trait ObjectWriter<T> {
    fn write(&mut self, obj: &T) -> Result<(), LkError>;
    fn flush(&mut self) -> Result<(), LkError>;
}

pub type BoxReader<T> = Box<dyn ObjectReader<T>>;
pub type BoxWriter<T> = Box<dyn ObjectWriter<T>>;

impl<T> ObjectReader<T> for BoxReader<T> {
    fn next(&mut self) -> Option<Result<T, LkError>> {
        (**self).next()
    }
}
