//! Bounded, newest-first journal of free-text notes.

pub mod errors;
pub mod store;

pub use errors::{JournalError, JournalResult};
pub use store::{DEFAULT_JOURNAL_CAPACITY, JournalEntry, JournalStore};
