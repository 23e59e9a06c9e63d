//! Collapse restarted threads (same label, disjoint time windows) into a
//! single recording.

use super::thread::ThreadRecording;
use log::debug;

/// Greedy single pass over `threads`, in place.
///
/// Each anchor `i` absorbs every later thread with its label that starts at
/// or after the anchor's current finish time. After an absorption the scan
/// stays on the same position, so a chain of restarts folds into one
/// anchor and the anchor's window grows as it goes. Returns how many
/// threads were absorbed.
pub(crate) fn merge_restarted_threads(threads: &mut Vec<ThreadRecording>) -> usize {
    let mut absorbed = 0;

    let mut i = 0;
    while i < threads.len() {
        let mut j = i + 1;
        while j < threads.len() {
            if threads[j].is_restart_of(&threads[i]) {
                let restart = threads.remove(j);
                debug!(
                    "Merging thread {} into thread {} ('{}')",
                    restart.id(),
                    threads[i].id(),
                    restart.label()
                );
                threads[i].absorb(restart);
                absorbed += 1;
            } else {
                j += 1;
            }
        }
        i += 1;
    }

    absorbed
}
