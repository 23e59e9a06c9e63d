//! Per-thread state: declared functions and events, the call tree and the
//! stack of calls that are still open.

use super::call::{offset_ids, CallArena, CallId, CallNode};
use super::identity::{EventIdentity, EventOccurrence, FunctionIdentity, Registry};
use super::{EventId, FunctionId, ThreadId, Timestamp};
use crate::utils::error::{RecordingError, Reference};
use log::debug;
use std::sync::Arc;

/// Everything recorded for one declared thread
#[derive(Debug, Clone)]
pub struct ThreadRecording {
    id: ThreadId,
    label: String,
    functions: Registry<FunctionIdentity>,
    calls: CallArena,
    top_level_calls: Vec<CallId>,
    active_stack: Vec<CallId>,
    max_stack_depth: usize,
    start_time: Option<Timestamp>,
    finish_time: Option<Timestamp>,
    events: Registry<EventIdentity>,
    event_occurrences: Vec<EventOccurrence>,
}

impl ThreadRecording {
    pub fn new(id: ThreadId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            functions: Registry::new(),
            calls: CallArena::new(),
            top_level_calls: Vec::new(),
            active_stack: Vec::new(),
            max_stack_depth: 0,
            start_time: None,
            finish_time: None,
            events: Registry::new(),
            event_occurrences: Vec::new(),
        }
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn declare_function(&mut self, function_id: FunctionId, label: &str) {
        self.functions
            .declare(FunctionIdentity::new(function_id, label));
    }

    pub fn function(&self, function_id: FunctionId) -> Option<&FunctionIdentity> {
        self.functions.get(function_id).map(Arc::as_ref)
    }

    /// Declared functions in declaration order
    pub fn functions(&self) -> &[Arc<FunctionIdentity>] {
        self.functions.as_slice()
    }

    /// Open a call of `function_id` at `time`.
    ///
    /// The new call becomes a child of the innermost open call, or a
    /// top-level call when nothing is open.
    pub fn call_start(
        &mut self,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<CallId, RecordingError> {
        let function = self
            .functions
            .get(function_id)
            .cloned()
            .ok_or(RecordingError::UnknownReference(Reference::Function {
                thread: self.id,
                function: function_id,
            }))?;

        let depth = self.active_stack.len();
        let id = match self.active_stack.last() {
            Some(&parent) => self.calls.open_child(parent, function, time, depth),
            None => {
                let id = self.calls.open_root(function, time, depth);
                self.top_level_calls.push(id);
                id
            }
        };

        self.active_stack.push(id);
        self.max_stack_depth = self.max_stack_depth.max(self.active_stack.len());

        if self.start_time.is_none() {
            self.start_time = Some(time);
        }

        Ok(id)
    }

    /// Close the innermost open call at `time`.
    ///
    /// `function_id` is not checked against the call being closed; the
    /// stack order is trusted.
    pub fn call_finish(
        &mut self,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<CallId, RecordingError> {
        let id = self
            .active_stack
            .pop()
            .ok_or(RecordingError::EmptyStack { thread: self.id })?;

        if self.calls[id].function().id() != function_id {
            debug!(
                "Thread {}: finish names function {} but closes '{}'",
                self.id,
                function_id,
                self.calls[id].label()
            );
        }

        self.calls.finish(id, time);
        self.finish_time = Some(time);

        Ok(id)
    }

    pub fn declare_event(&mut self, event_id: EventId, label: &str) {
        self.events.declare(EventIdentity::new(event_id, label));
    }

    pub fn emit_event(&mut self, event_id: EventId, time: Timestamp) -> Result<(), RecordingError> {
        let event = self
            .events
            .get(event_id)
            .cloned()
            .ok_or(RecordingError::UnknownReference(Reference::Event {
                thread: self.id,
                event: event_id,
            }))?;

        self.event_occurrences
            .push(EventOccurrence::new(event, time));
        Ok(())
    }

    /// Resolve a declared event by its id
    pub fn event(&self, event_id: EventId) -> Option<&EventIdentity> {
        self.events.get(event_id).map(Arc::as_ref)
    }

    /// Declared events in declaration order
    pub fn events(&self) -> &[Arc<EventIdentity>] {
        self.events.as_slice()
    }

    /// Emitted events in emission order
    pub fn event_occurrences(&self) -> &[EventOccurrence] {
        &self.event_occurrences
    }

    pub fn calls(&self) -> &CallArena {
        &self.calls
    }

    pub fn call(&self, id: CallId) -> Option<&CallNode> {
        self.calls.get(id)
    }

    pub fn top_level_calls(&self) -> &[CallId] {
        &self.top_level_calls
    }

    /// Calls currently open, outermost first
    pub fn active_stack(&self) -> &[CallId] {
        &self.active_stack
    }

    pub fn max_stack_depth(&self) -> usize {
        self.max_stack_depth
    }

    /// Time of the first call start
    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    /// Time of the most recent call finish
    pub fn finish_time(&self) -> Option<Timestamp> {
        self.finish_time
    }

    /// Whether `self` looks like a later run of the same logical thread.
    ///
    /// Absent times order before every present time, so a thread that never
    /// started is only a restart of an anchor that never finished.
    pub(crate) fn is_restart_of(&self, anchor: &ThreadRecording) -> bool {
        self.label == anchor.label && self.start_time >= anchor.finish_time
    }

    /// Fold a later run of the same logical thread into this one
    pub(crate) fn absorb(&mut self, other: ThreadRecording) {
        if !other.active_stack.is_empty() {
            debug!(
                "Thread {} absorbed with {} calls still open",
                other.id,
                other.active_stack.len()
            );
        }

        self.max_stack_depth = self.max_stack_depth.max(other.max_stack_depth);
        self.start_time = earliest(self.start_time, other.start_time);
        self.finish_time = self.finish_time.max(other.finish_time);

        self.functions.extend(other.functions);

        let offset = self.calls.append(other.calls);
        self.top_level_calls
            .extend(offset_ids(&other.top_level_calls, offset));

        self.events.extend(other.events);
        self.event_occurrences.extend(other.event_occurrences);
    }
}

fn earliest(a: Option<Timestamp>, b: Option<Timestamp>) -> Option<Timestamp> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
