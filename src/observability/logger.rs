//! Structured one-line JSON logging.
//!
//! One log line is one event: synchronous, unbuffered, deterministic key
//! order (serde_json's map is a BTreeMap, so keys emit sorted). INFO goes
//! to stdout, WARN and ERROR to stderr. Nothing here is load-bearing for
//! the store contract; callers log around operations, never inside a
//! failure path's control flow.

use std::fmt;
use std::io::{self, Write};

use serde_json::{Map, Value};

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous JSON line logger.
pub struct Logger;

impl Logger {
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Level::Info, event, fields, &mut io::stdout());
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Level::Warn, event, fields, &mut io::stderr());
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Level::Error, event, fields, &mut io::stderr());
    }

    fn emit<W: Write>(level: Level, event: &str, fields: &[(&str, &str)], writer: &mut W) {
        let mut map = Map::new();
        map.insert("event".to_string(), Value::String(event.to_string()));
        map.insert("level".to_string(), Value::String(level.as_str().to_string()));
        for (key, value) in fields {
            map.insert((*key).to_string(), Value::String((*value).to_string()));
        }

        // One write, one flush; a failing logger must never fail the caller.
        let _ = writeln!(writer, "{}", Value::Object(map));
        let _ = writer.flush();
    }
}

#[cfg(test)]
fn capture(level: Level, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::emit(level, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
