//! Embedded persistence for exam windows and candidate accounts.

mod sqlite;

pub use sqlite::SqliteStore;
