//! Line-oriented trace decoder.
//!
//! Turns the text trace format into [`TraceConsumer`](crate::recording::TraceConsumer)
//! notifications. The decoder knows nothing about the model it feeds.

pub mod line;
pub mod loader;

pub use line::{parse_line, TraceRecord};
pub use loader::{load_recording, LoadStats, TraceParser};
