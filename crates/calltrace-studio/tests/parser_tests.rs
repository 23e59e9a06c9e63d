use calltrace_studio::parser::{parse_line, TraceParser, TraceRecord};
use calltrace_studio::recording::{
    CounterId, EventId, FunctionId, Recording, ThreadId, Timestamp, TraceConsumer,
};
use calltrace_studio::utils::{IngestError, LoadError, ParseError, RecordingError, Reference};
use pretty_assertions::assert_eq;
use std::io::Cursor;

/// Consumer that only remembers what it was told
#[derive(Default)]
struct RecordingLog {
    entries: Vec<String>,
}

impl TraceConsumer for RecordingLog {
    fn declare_thread(&mut self, thread_id: ThreadId, label: &str) -> Result<(), RecordingError> {
        self.entries.push(format!("thread {} {}", thread_id, label));
        Ok(())
    }

    fn declare_function(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        label: &str,
    ) -> Result<(), RecordingError> {
        self.entries
            .push(format!("function {} {} {}", thread_id, function_id, label));
        Ok(())
    }

    fn call_start(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<(), RecordingError> {
        self.entries
            .push(format!("start {} {} {}", thread_id, function_id, time));
        Ok(())
    }

    fn call_finish(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<(), RecordingError> {
        self.entries
            .push(format!("finish {} {} {}", thread_id, function_id, time));
        Ok(())
    }

    fn declare_event(
        &mut self,
        thread_id: ThreadId,
        event_id: EventId,
        label: &str,
    ) -> Result<(), RecordingError> {
        self.entries
            .push(format!("event {} {} {}", thread_id, event_id, label));
        Ok(())
    }

    fn emit_event(
        &mut self,
        thread_id: ThreadId,
        event_id: EventId,
        time: Timestamp,
    ) -> Result<(), RecordingError> {
        self.entries
            .push(format!("emit {} {} {}", thread_id, event_id, time));
        Ok(())
    }

    fn declare_counter(&mut self, counter_id: CounterId, label: &str) -> Result<(), RecordingError> {
        self.entries.push(format!("counter {} {}", counter_id, label));
        Ok(())
    }

    fn counter_sample(
        &mut self,
        counter_id: CounterId,
        time: Timestamp,
        value: f64,
    ) -> Result<(), RecordingError> {
        self.entries
            .push(format!("sample {} {} {}", counter_id, time, value));
        Ok(())
    }
}

fn feed(line: &str) -> Vec<String> {
    let mut log = RecordingLog::default();
    TraceParser::new(&mut log).parse(line).unwrap();
    log.entries
}

#[test]
fn test_thread_declaration() {
    assert_eq!(feed("T 332 My Thread Name"), vec!["thread 332 My Thread Name"]);
}

#[test]
fn test_function_declaration() {
    assert_eq!(
        feed("F 113 223 My function name"),
        vec!["function 113 223 My function name"]
    );
}

#[test]
fn test_call_start_and_finish() {
    assert_eq!(feed("S 0 113 333"), vec!["start 0 113 333"]);
    assert_eq!(feed("E 4 113 333"), vec!["finish 4 113 333"]);
}

#[test]
fn test_event_declaration_and_emit() {
    assert_eq!(
        feed("V 113 223 My event name"),
        vec!["event 113 223 My event name"]
    );
    assert_eq!(feed("Y 0 113 333"), vec!["emit 0 113 333"]);
}

#[test]
fn test_comments_and_blank_lines_skipped() {
    assert!(feed("# a comment").is_empty());
    assert!(feed("").is_empty());
    assert!(feed("   ").is_empty());
}

#[test]
fn test_unknown_tag_skipped() {
    assert_eq!(parse_line("Q 1 2 3").unwrap(), None);
}

#[test]
fn test_trailing_whitespace_trimmed() {
    assert_eq!(
        parse_line("T 1 main  \r").unwrap(),
        Some(TraceRecord::Thread {
            thread_id: 1,
            label: "main".to_string(),
        })
    );
}

#[test]
fn test_negative_time_accepted() {
    assert_eq!(
        parse_line("S 1 2 -50").unwrap(),
        Some(TraceRecord::CallStart {
            thread_id: 1,
            function_id: 2,
            time: -50,
        })
    );
}

#[test]
fn test_missing_field() {
    assert_eq!(
        parse_line("S 1 2"),
        Err(ParseError::MissingField {
            tag: 'S',
            field: "time"
        })
    );
    assert_eq!(
        parse_line("T 7"),
        Err(ParseError::MissingField {
            tag: 'T',
            field: "thread_label"
        })
    );
}

#[test]
fn test_invalid_number() {
    assert!(matches!(
        parse_line("S one 2 3"),
        Err(ParseError::InvalidNumber { field: "thread_id", .. })
    ));
    assert!(matches!(
        parse_line("E 1 2 soon"),
        Err(ParseError::InvalidNumber { field: "time", .. })
    ));
}

#[test]
fn test_load_reader_counts_lines_and_records() {
    let trace = "# header\nT 1 main\n\nF 1 10 run\nS 1 10 0\nE 1 10 5\n";
    let mut log = RecordingLog::default();

    let stats = TraceParser::new(&mut log)
        .load_reader(Cursor::new(trace))
        .unwrap();

    assert_eq!(stats.lines, 6);
    assert_eq!(stats.records, 4);
    assert_eq!(
        log.entries,
        vec!["thread 1 main", "function 1 10 run", "start 1 10 0", "finish 1 10 5"]
    );
}

#[test]
fn test_load_reader_reports_parse_failure_line() {
    let trace = "T 1 main\nF 1 10 run\nS 1 10 x\n";
    let mut recording = Recording::new();

    let err = TraceParser::new(&mut recording)
        .load_reader(Cursor::new(trace))
        .unwrap_err();

    match err {
        LoadError::Line {
            line_number,
            line,
            source,
        } => {
            assert_eq!(line_number, 3);
            assert_eq!(line, "S 1 10 x");
            assert!(matches!(source, IngestError::Parse(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_load_reader_reports_recording_failure_line() {
    let trace = "T 1 main\nS 1 10 0\n";
    let mut recording = Recording::new();

    let err = TraceParser::new(&mut recording)
        .load_reader(Cursor::new(trace))
        .unwrap_err();

    match err {
        LoadError::Line {
            line_number,
            source,
            ..
        } => {
            assert_eq!(line_number, 2);
            match source {
                IngestError::Recording(e) => assert_eq!(
                    e,
                    RecordingError::UnknownReference(Reference::Function {
                        thread: 1,
                        function: 10
                    })
                ),
                other => panic!("unexpected source: {:?}", other),
            }
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_load_stops_at_first_failure() {
    let trace = "T 1 main\nE 1 10 5\nT 2 worker\n";
    let mut recording = Recording::new();

    assert!(TraceParser::new(&mut recording)
        .load_reader(Cursor::new(trace))
        .is_err());
    assert_eq!(recording.threads().len(), 1);
}
