//! I/O utilities for reading the watch history export.

pub mod history;

// Re-export commonly used types and functions
pub use history::{load_watch_history, parse_watch_history, HistoryError, WatchEntry};
