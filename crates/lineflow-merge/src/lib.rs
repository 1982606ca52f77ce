//! `Merger`: a fair, non-deterministic fan-in that interleaves `N` bounded
//! producer sequences into one output sequence.
//!
//! One worker thread per input blocking-puts into a single shared output
//! queue; each worker decrements a shared "alive producers" counter (the
//! `ConcurrencyPrimitives` `Guarded` counter from `lineflow-core`) when its
//! input ends. A dedicated closer thread blocks on that counter reaching
//! zero and then closes the output queue — since the queue is FIFO, every
//! value already enqueued drains to the consumer before the resulting
//! `Item::End` does, which is exactly "alive == 0 and the queue is empty"
//! without needing to poll the queue's length.
//!
//! Fairness follows from backpressure alone, per the design: a fast
//! producer blocks on a full output queue, giving slower producers a
//! chance to land their own items first. There is no round-robin
//! scheduler.

use lineflow_core::queue::bounded_queue;
use lineflow_core::{Guarded, LineSequence};
use std::sync::Arc;
use std::thread;

/// Fans `N` input sequences into one.
pub struct Merger;

impl Merger {
    /// Spawn one pump thread per input plus a closer thread, and return the
    /// merged output sequence. `capacity` is the bound `Q` of the shared
    /// output queue.
    pub fn spawn(inputs: Vec<Arc<LineSequence>>, capacity: usize) -> Arc<LineSequence> {
        let (tx, rx) = bounded_queue::<String>(capacity);
        let alive = Arc::new(Guarded::new(inputs.len() as i64));

        for input in inputs {
            let tx = tx.clone();
            let alive = Arc::clone(&alive);
            thread::spawn(move || {
                while let Some(line) = input.recv() {
                    if tx.put(line).is_err() {
                        // Output was closed by its consumer: stop pumping
                        // and release this input's own backing resources.
                        tracing::debug!("merge output closed; stopping pump");
                        input.close();
                        break;
                    }
                }
                alive.update_and_notify_all(|n| *n -= 1);
            });
        }

        thread::spawn(move || {
            alive.wait_while(|n| *n > 0);
            tracing::debug!("all merge inputs drained; closing output");
            tx.close();
        });

        Arc::new(LineSequence::new(rx))
    }
}

/// Convenience free function for call sites that don't need the `Merger`
/// type itself.
pub fn merge(inputs: Vec<Arc<LineSequence>>, capacity: usize) -> Arc<LineSequence> {
    Merger::spawn(inputs, capacity)
}
