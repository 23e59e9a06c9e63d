//! The notification surface a trace decoder drives.

use super::{CounterId, EventId, FunctionId, ThreadId, Timestamp};
use crate::utils::error::RecordingError;

/// Receiver of decoded trace notifications, invoked strictly in source order.
///
/// [`Recording`](super::Recording) is the real implementation; decoders only
/// depend on this trait.
pub trait TraceConsumer {
    fn declare_thread(&mut self, thread_id: ThreadId, label: &str) -> Result<(), RecordingError>;

    fn declare_function(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        label: &str,
    ) -> Result<(), RecordingError>;

    fn call_start(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<(), RecordingError>;

    fn call_finish(
        &mut self,
        thread_id: ThreadId,
        function_id: FunctionId,
        time: Timestamp,
    ) -> Result<(), RecordingError>;

    fn declare_event(
        &mut self,
        thread_id: ThreadId,
        event_id: EventId,
        label: &str,
    ) -> Result<(), RecordingError>;

    fn emit_event(
        &mut self,
        thread_id: ThreadId,
        event_id: EventId,
        time: Timestamp,
    ) -> Result<(), RecordingError>;

    fn declare_counter(&mut self, counter_id: CounterId, label: &str)
        -> Result<(), RecordingError>;

    fn counter_sample(
        &mut self,
        counter_id: CounterId,
        time: Timestamp,
        value: f64,
    ) -> Result<(), RecordingError>;
}
