//! `LineSequence`: a lazy, single-consumption, cancellable sequence of
//! lines, backed by a [`QueueReceiver`].
//!
//! Two things have to happen when a `LineSequence` is closed, and a plain
//! `QueueReceiver::take` only gives us one of them for free:
//!
//! - Any thread already blocked in [`LineSequence::recv`] must wake within
//!   a bounded number of operations. A dedicated zero-payload "closed"
//!   channel handles this: [`LineSequence::close`] drops its sending half,
//!   and `recv` races the data channel against that channel with
//!   `crossbeam_channel::select!`.
//! - The producer feeding this sequence must see its next `put` fail
//!   immediately rather than filling a queue nobody drains any more (the
//!   partitioner's "lossy on the closed side" rule depends on this). That
//!   needs the underlying [`QueueReceiver`] itself to be dropped, which is
//!   why it lives behind a `Mutex<Option<_>>` that `close` empties out.
use crate::queue::QueueReceiver;
use crossbeam_channel::{Receiver, Sender, select};
use std::sync::Mutex;

/// A lazy, closable sequence of text lines.
pub struct LineSequence {
    rx: Mutex<Option<QueueReceiver<String>>>,
    closed_tx: Mutex<Option<Sender<()>>>,
    closed_rx: Receiver<()>,
}

impl LineSequence {
    pub fn new(rx: QueueReceiver<String>) -> Self {
        let (closed_tx, closed_rx) = crossbeam_channel::bounded(0);
        Self {
            rx: Mutex::new(Some(rx)),
            closed_tx: Mutex::new(Some(closed_tx)),
            closed_rx,
        }
    }

    /// Pull the next line, or `None` at end-of-sequence: the producer
    /// finished, or the sequence was [`LineSequence::close`]d.
    pub fn recv(&self) -> Option<String> {
        let rx = {
            let guard = self.rx.lock().unwrap_or_else(|p| p.into_inner());
            guard.clone()
        };
        let Some(rx) = rx else {
            return None;
        };

        select! {
            recv(rx.raw()) -> msg => match msg {
                Ok(item) => item.into_value(),
                Err(_) => None,
            },
            recv(self.closed_rx) -> _ => None,
        }
    }

    /// Interrupt this sequence. Any thread currently blocked in
    /// [`LineSequence::recv`] wakes within one queue operation and
    /// observes `None`; the backing queue's receiver is dropped so the
    /// producer's next `put` fails immediately instead of blocking on a
    /// consumer that is no longer listening; any future call to `recv`
    /// also returns `None` without blocking.
    pub fn close(&self) {
        {
            let mut guard = self.rx.lock().unwrap_or_else(|p| p.into_inner());
            *guard = None;
        }
        let mut guard = self.closed_tx.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }
}

impl Iterator for LineSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::bounded_queue;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn recv_yields_values_in_order_then_none_on_end() {
        let (tx, rx) = bounded_queue(4);
        tx.put("a".to_string()).unwrap();
        tx.put("b".to_string()).unwrap();
        tx.close();

        let seq = LineSequence::new(rx);
        assert_eq!(seq.recv(), Some("a".to_string()));
        assert_eq!(seq.recv(), Some("b".to_string()));
        assert_eq!(seq.recv(), None);
    }

    #[test]
    fn close_wakes_a_blocked_recv_within_a_bounded_time() {
        let (_tx, rx) = bounded_queue::<String>(1);
        let seq = std::sync::Arc::new(LineSequence::new(rx));

        let blocked = {
            let seq = std::sync::Arc::clone(&seq);
            thread::spawn(move || {
                let start = Instant::now();
                let result = seq.recv();
                (result, start.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        seq.close();

        let (result, _elapsed) = blocked.join().expect("recv thread should not panic");
        assert_eq!(result, None);
    }

    #[test]
    fn close_then_recv_returns_none_without_blocking() {
        let (_tx, rx) = bounded_queue::<String>(1);
        let seq = LineSequence::new(rx);
        seq.close();
        assert_eq!(seq.recv(), None);
    }

    #[test]
    fn close_makes_a_pending_put_fail_instead_of_blocking_forever() {
        let (tx, rx) = bounded_queue::<String>(1);
        let seq = LineSequence::new(rx);
        seq.close();

        assert_eq!(tx.put("dropped on the floor".to_string()), Err(crossbeam_channel::SendError("dropped on the floor".to_string())));
    }

    #[test]
    fn iterator_adapter_collects_all_lines() {
        let (tx, rx) = bounded_queue(4);
        for line in ["x", "y", "z"] {
            tx.put(line.to_string()).unwrap();
        }
        tx.close();

        let seq = LineSequence::new(rx);
        let collected: Vec<String> = seq.collect();
        assert_eq!(collected, vec!["x", "y", "z"]);
    }
}
