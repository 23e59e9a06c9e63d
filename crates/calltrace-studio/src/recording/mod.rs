//! In-memory model rebuilt from a trace.
//!
//! A [`Recording`] receives notifications in source order and routes each one
//! to the thread or counter it names:
//! - call start/finish pairs become per-thread call trees
//! - event emissions become per-thread occurrence lists
//! - counter samples become time series with running bounds
//!
//! Once ingestion ends, [`Recording::merge_restarted_threads`] may be run
//! once to fold restarted threads together. After that the model is only
//! read.

mod call;
mod consumer;
mod counter;
mod identity;
mod merge;
mod thread;

pub use call::{CallArena, CallId, CallNode};
pub use consumer::TraceConsumer;
pub use counter::{CounterIdentity, CounterSample};
pub use identity::{Declared, EventIdentity, EventOccurrence, FunctionIdentity, Registry};
pub use thread::ThreadRecording;

use crate::utils::error::{RecordingError, Reference};
use log::{debug, warn};
use std::collections::HashMap;

/// Trace clock value, in whatever unit the producer used
pub type Timestamp = i64;

pub type ThreadId = u64;
pub type FunctionId = u64;
pub type EventId = u64;
pub type CounterId = u64;

/// Root of the reconstructed model
#[derive(Debug, Clone, Default)]
pub struct Recording {
    threads: Vec<ThreadRecording>,
    thread_index: HashMap<ThreadId, usize>,
    counters: Vec<CounterIdentity>,
    counter_index: HashMap<CounterId, usize>,
    start_time: Option<Timestamp>,
    finish_time: Option<Timestamp>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    /// Threads in declaration order (or merge order, once merged)
    pub fn threads(&self) -> &[ThreadRecording] {
        &self.threads
    }

    pub fn thread(&self, thread_id: ThreadId) -> Option<&ThreadRecording> {
        self.thread_index
            .get(&thread_id)
            .map(|&position| &self.threads[position])
    }

    /// Counters in declaration order
    pub fn counters(&self) -> &[CounterIdentity] {
        &self.counters
    }

    pub fn counter(&self, counter_id: CounterId) -> Option<&CounterIdentity> {
        self.counter_index
            .get(&counter_id)
            .map(|&position| &self.counters[position])
    }

    /// Time of the first call start on any thread
    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    /// Time of the last call finish received, whichever thread it was on
    pub fn finish_time(&self) -> Option<Timestamp> {
        self.finish_time
    }

    pub fn declare_thread(&mut self, thread_id: ThreadId, label: &str) {
        debug!("Declaring thread {} ('{}')", thread_id, label);

        if self
            .thread_index
            .insert(thread_id, self.threads.len())
            .is_some()
        {
            warn!(
                "Thread {} declared twice, later references resolve to '{}'",
                thread_id, label
            );
        }
        self.threads.push(ThreadRecording::new(thread_id, label));
    }

    pub fn declare_function(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        label: &str,
    ) -> Result<(), RecordingError> {
        self.thread_mut(thread_id)?
            .declare_function(function_id, label);
        Ok(())
    }

    pub fn call_start(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<CallId, RecordingError> {
        let id = self.thread_mut(thread_id)?.call_start(function_id, time)?;

        if self.start_time.is_none() {
            self.start_time = Some(time);
        }

        Ok(id)
    }

    /// Close the innermost open call on `thread_id`.
    ///
    /// The recording's finish time follows the last finish received, even if
    /// it is earlier than a previous one.
    pub fn call_finish(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<CallId, RecordingError> {
        let id = self.thread_mut(thread_id)?.call_finish(function_id, time)?;
        self.finish_time = Some(time);
        Ok(id)
    }

    pub fn declare_event(
        &mut self,
        thread_id: ThreadId,
        event_id: EventId,
        label: &str,
    ) -> Result<(), RecordingError> {
        self.thread_mut(thread_id)?.declare_event(event_id, label);
        Ok(())
    }

    pub fn emit_event(
        &mut self,
        thread_id: ThreadId,
        event_id: EventId,
        time: Timestamp,
    ) -> Result<(), RecordingError> {
        self.thread_mut(thread_id)?.emit_event(event_id, time)
    }

    pub fn declare_counter(&mut self, counter_id: CounterId, label: &str) {
        debug!("Declaring counter {} ('{}')", counter_id, label);

        if self
            .counter_index
            .insert(counter_id, self.counters.len())
            .is_some()
        {
            warn!(
                "Counter {} declared twice, later samples go to '{}'",
                counter_id, label
            );
        }
        self.counters.push(CounterIdentity::new(counter_id, label));
    }

    pub fn counter_sample(
        &mut self,
        counter_id: CounterId,
        time: Timestamp,
        value: f64,
    ) -> Result<(), RecordingError> {
        let position = *self
            .counter_index
            .get(&counter_id)
            .ok_or(RecordingError::UnknownReference(Reference::Counter(
                counter_id,
            )))?;

        self.counters[position].add_sample(CounterSample::new(time, value));
        Ok(())
    }

    /// Fold threads that restarted under the same label into their first
    /// run. Returns the number of threads absorbed.
    ///
    /// Must run once, after ingestion: ids of absorbed threads no longer
    /// resolve afterwards.
    pub fn merge_restarted_threads(&mut self) -> usize {
        let before = self.threads.len();
        let absorbed = merge::merge_restarted_threads(&mut self.threads);

        self.thread_index = self
            .threads
            .iter()
            .enumerate()
            .map(|(position, thread)| (thread.id(), position))
            .collect();

        debug!(
            "Merged restarted threads: {} -> {} threads",
            before,
            self.threads.len()
        );
        absorbed
    }

    /// Total number of calls recorded across all threads
    pub fn call_count(&self) -> usize {
        self.threads.iter().map(|thread| thread.calls().len()).sum()
    }

    fn thread_mut(&mut self, thread_id: ThreadId) -> Result<&mut ThreadRecording, RecordingError> {
        let position = *self
            .thread_index
            .get(&thread_id)
            .ok_or(RecordingError::UnknownReference(Reference::Thread(
                thread_id,
            )))?;

        Ok(&mut self.threads[position])
    }
}

impl TraceConsumer for Recording {
    fn declare_thread(&mut self, thread_id: ThreadId, label: &str) -> Result<(), RecordingError> {
        Recording::declare_thread(self, thread_id, label);
        Ok(())
    }

    fn declare_function(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        label: &str,
    ) -> Result<(), RecordingError> {
        Recording::declare_function(self, thread_id, function_id, label)
    }

    fn call_start(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<(), RecordingError> {
        Recording::call_start(self, thread_id, function_id, time).map(|_| ())
    }

    fn call_finish(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<(), RecordingError> {
        Recording::call_finish(self, thread_id, function_id, time).map(|_| ())
    }

    fn declare_event(
        &mut self,
        thread_id: ThreadId,
        event_id: EventId,
        label: &str,
    ) -> Result<(), RecordingError> {
        Recording::declare_event(self, thread_id, event_id, label)
    }

    fn emit_event(
        &mut self,
        thread_id: ThreadId,
        event_id: EventId,
        time: Timestamp,
    ) -> Result<(), RecordingError> {
        Recording::emit_event(self, thread_id, event_id, time)
    }

    fn declare_counter(
        &mut self,
        counter_id: CounterId,
        label: &str,
    ) -> Result<(), RecordingError> {
        Recording::declare_counter(self, counter_id, label);
        Ok(())
    }

    fn counter_sample(
        &mut self,
        counter_id: CounterId,
        time: Timestamp,
        value: f64,
    ) -> Result<(), RecordingError> {
        Recording::counter_sample(self, counter_id, time, value)
    }
}
