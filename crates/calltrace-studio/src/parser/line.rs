//! Decoding of single trace lines.
//!
//! Each line is one record: a one-letter tag followed by space separated
//! fields. The last field of declaration records is a label that may itself
//! contain spaces.
//!
//! ```text
//! # comment
//! T <thread> <label>
//! F <thread> <function> <label>
//! S <thread> <function> <time>
//! E <thread> <function> <time>
//! V <thread> <event> <label>
//! Y <thread> <event> <time>
//! ```

use crate::recording::{EventId, FunctionId, ThreadId, Timestamp, TraceConsumer};
use crate::utils::error::{ParseError, RecordingError};
use log::warn;
use std::str::SplitN;

/// One decoded trace record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceRecord {
    Thread {
        thread_id: ThreadId,
        label: String,
    },
    Function {
        thread_id: ThreadId,
        function_id: FunctionId,
        label: String,
    },
    CallStart {
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    },
    CallFinish {
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    },
    Event {
        thread_id: ThreadId,
        event_id: EventId,
        label: String,
    },
    EventEmit {
        thread_id: ThreadId,
        event_id: EventId,
        time: Timestamp,
    },
}

impl TraceRecord {
    /// Feed this record to a consumer
    pub fn dispatch<C: TraceConsumer + ?Sized>(&self, consumer: &mut C) -> Result<(), RecordingError> {
        match self {
            Self::Thread { thread_id, label } => consumer.declare_thread(*thread_id, label),
            Self::Function {
                thread_id,
                function_id,
                label,
            } => consumer.declare_function(*thread_id, *function_id, label),
            Self::CallStart {
                thread_id,
                function_id,
                time,
            } => consumer.call_start(*thread_id, *function_id, *time),
            Self::CallFinish {
                thread_id,
                function_id,
                time,
            } => consumer.call_finish(*thread_id, *function_id, *time),
            Self::Event {
                thread_id,
                event_id,
                label,
            } => consumer.declare_event(*thread_id, *event_id, label),
            Self::EventEmit {
                thread_id,
                event_id,
                time,
            } => consumer.emit_event(*thread_id, *event_id, *time),
        }
    }
}

/// Decode one line of a trace.
///
/// Returns `Ok(None)` for comments, blank lines and unknown tags.
///
/// # Errors
/// * `ParseError::MissingField` - A required field is absent
/// * `ParseError::InvalidNumber` - An id or time is not an integer
pub fn parse_line(line: &str) -> Result<Option<TraceRecord>, ParseError> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let tag = line.split(' ').next().unwrap_or_default();

    let record = match tag {
        "T" => {
            let mut fields = Fields::new('T', line, 3);
            TraceRecord::Thread {
                thread_id: fields.id("thread_id")?,
                label: fields.text("thread_label")?,
            }
        }
        "F" => {
            let mut fields = Fields::new('F', line, 4);
            TraceRecord::Function {
                thread_id: fields.id("thread_id")?,
                function_id: fields.id("function_id")?,
                label: fields.text("function_label")?,
            }
        }
        "S" => {
            let mut fields = Fields::new('S', line, 4);
            TraceRecord::CallStart {
                thread_id: fields.id("thread_id")?,
                function_id: fields.id("function_id")?,
                time: fields.time("time")?,
            }
        }
        "E" => {
            let mut fields = Fields::new('E', line, 4);
            TraceRecord::CallFinish {
                thread_id: fields.id("thread_id")?,
                function_id: fields.id("function_id")?,
                time: fields.time("time")?,
            }
        }
        "V" => {
            let mut fields = Fields::new('V', line, 4);
            TraceRecord::Event {
                thread_id: fields.id("thread_id")?,
                event_id: fields.id("event_id")?,
                label: fields.text("event_label")?,
            }
        }
        "Y" => {
            let mut fields = Fields::new('Y', line, 4);
            TraceRecord::EventEmit {
                thread_id: fields.id("thread_id")?,
                event_id: fields.id("event_id")?,
                time: fields.time("time")?,
            }
        }
        other => {
            warn!("Skipping record with unknown tag '{}'", other);
            return Ok(None);
        }
    };

    Ok(Some(record))
}

/// Field cursor over a record, the tag already consumed
struct Fields<'a> {
    tag: char,
    parts: SplitN<'a, char>,
}

impl<'a> Fields<'a> {
    fn new(tag: char, line: &'a str, count: usize) -> Self {
        let mut parts = line.splitn(count, ' ');
        parts.next();
        Self { tag, parts }
    }

    fn next(&mut self, field: &'static str) -> Result<&'a str, ParseError> {
        self.parts
            .next()
            .filter(|value| !value.is_empty())
            .ok_or(ParseError::MissingField {
                tag: self.tag,
                field,
            })
    }

    fn id(&mut self, field: &'static str) -> Result<u64, ParseError> {
        let value = self.next(field)?;
        value.trim().parse().map_err(|_| ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })
    }

    fn time(&mut self, field: &'static str) -> Result<Timestamp, ParseError> {
        let value = self.next(field)?;
        value.trim().parse().map_err(|_| ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })
    }

    fn text(&mut self, field: &'static str) -> Result<String, ParseError> {
        self.next(field).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        assert_eq!(parse_line("#a_comment_without_spaces").unwrap(), None);
        assert_eq!(parse_line("# another comment with spaces").unwrap(), None);
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_unknown_tag_is_skipped() {
        assert_eq!(parse_line("Q 1 2 3").unwrap(), None);
        assert_eq!(parse_line("TT 1 label").unwrap(), None);
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        assert_eq!(
            parse_line("T 1 worker  \r\n").unwrap(),
            Some(TraceRecord::Thread {
                thread_id: 1,
                label: "worker".to_string()
            })
        );
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            parse_line("T 3"),
            Err(ParseError::MissingField {
                tag: 'T',
                field: "thread_label"
            })
        );
        assert_eq!(
            parse_line("S 0 1"),
            Err(ParseError::MissingField {
                tag: 'S',
                field: "time"
            })
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(
            parse_line("E 0 x 12"),
            Err(ParseError::InvalidNumber {
                field: "function_id",
                value: "x".to_string()
            })
        );
        assert!(parse_line("Y 0 1 12.5").is_err());
        assert!(parse_line("T -1 negative").is_err());
    }

    #[test]
    fn test_negative_time_is_accepted() {
        assert_eq!(
            parse_line("S 0 1 -40").unwrap(),
            Some(TraceRecord::CallStart {
                thread_id: 0,
                function_id: 1,
                time: -40
            })
        );
    }
}
