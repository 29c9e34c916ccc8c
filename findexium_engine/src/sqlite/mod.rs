//! SQLite backend for the Findexium engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
