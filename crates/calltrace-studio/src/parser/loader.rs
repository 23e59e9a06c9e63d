//! Streaming a whole trace into a consumer.

use super::line::parse_line;
use crate::recording::{Recording, TraceConsumer};
use crate::utils::error::{IngestError, LoadError};
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Counts gathered while loading a trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read, including comments and blank lines
    pub lines: usize,

    /// Records dispatched to the consumer
    pub records: usize,
}

/// Feeds decoded trace lines to a [`TraceConsumer`] in file order
pub struct TraceParser<'a, C: TraceConsumer + ?Sized> {
    consumer: &'a mut C,
}

impl<'a, C: TraceConsumer + ?Sized> TraceParser<'a, C> {
    pub fn new(consumer: &'a mut C) -> Self {
        Self { consumer }
    }

    /// Decode and dispatch a single line.
    ///
    /// Returns whether the line carried a record.
    pub fn parse(&mut self, line: &str) -> Result<bool, IngestError> {
        match parse_line(line)? {
            Some(record) => {
                record.dispatch(&mut *self.consumer)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Read every line of `reader`, stopping at the first failure.
    ///
    /// # Errors
    /// * `LoadError::Io` - The reader failed
    /// * `LoadError::Line` - A line could not be decoded or applied; carries
    ///   the 1-based line number and the raw line
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> Result<LoadStats, LoadError> {
        let mut stats = LoadStats::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            stats.lines += 1;

            match self.parse(&line) {
                Ok(true) => stats.records += 1,
                Ok(false) => {}
                Err(source) => {
                    return Err(LoadError::Line {
                        line_number: index + 1,
                        line: line.trim_end().to_string(),
                        source,
                    })
                }
            }
        }

        debug!(
            "Loaded {} records from {} lines",
            stats.records, stats.lines
        );
        Ok(stats)
    }

    /// Open `path` and load it with [`load_reader`](Self::load_reader)
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadStats, LoadError> {
        let path = path.as_ref();
        debug!("Opening trace: {}", path.display());

        let file = File::open(path)?;
        self.load_reader(BufReader::new(file))
    }
}

/// Build a fresh [`Recording`] from a trace file
///
/// **Public** - main entry point for loading
pub fn load_recording(path: impl AsRef<Path>) -> Result<Recording, LoadError> {
    let path = path.as_ref();
    let mut recording = Recording::new();

    let stats = TraceParser::new(&mut recording).load_file(path)?;

    info!(
        "Loaded {}: {} records, {} threads, {} calls",
        path.display(),
        stats.records,
        recording.threads().len(),
        recording.call_count()
    );
    Ok(recording)
}
