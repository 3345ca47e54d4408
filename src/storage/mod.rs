//! Storage layer for backoffice-cli
//!
//! Provides JSON file helpers with atomic writes and an offline record
//! source that reads exported backend data from a directory.

pub mod file_io;
pub mod offline;

pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use offline::FileSource;
