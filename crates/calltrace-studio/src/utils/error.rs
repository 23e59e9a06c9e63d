//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::recording::{CounterId, EventId, FunctionId, ThreadId};
use std::fmt;
use thiserror::Error;

/// A declared id that a notification referred to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Thread(ThreadId),
    Function { thread: ThreadId, function: FunctionId },
    Event { thread: ThreadId, event: EventId },
    Counter(CounterId),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thread(id) => write!(f, "thread {}", id),
            Self::Function { thread, function } => {
                write!(f, "function {} on thread {}", function, thread)
            }
            Self::Event { thread, event } => write!(f, "event {} on thread {}", event, thread),
            Self::Counter(id) => write!(f, "counter {}", id),
        }
    }
}

/// Errors raised by the recording while replaying notifications
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordingError {
    #[error("Unknown reference: {0} was never declared")]
    UnknownReference(Reference),

    #[error("Call finish on thread {thread} with no open call")]
    EmptyStack { thread: ThreadId },
}

/// Errors that can occur while decoding a single trace line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Record '{tag}' is missing field '{field}'")]
    MissingField { tag: char, field: &'static str },

    #[error("Field '{field}' is not an integer: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Failure attached to a single line of input
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Recording(#[from] RecordingError),
}

/// Errors that can occur while loading a trace file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line_number}: {source} (line: [{line}])")]
    Line {
        line_number: usize,
        line: String,
        #[source]
        source: IngestError,
    },
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading a settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}
