//! Structured logging for store and server events.

mod logger;

pub use logger::{Level, Logger};
