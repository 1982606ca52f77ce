//! `BoundedQueue`: a fixed-capacity FIFO with blocking put/take, built over
//! [`crossbeam_channel`]'s bounded channel.
//!
//! Rather than a single struct with separate lock-guarded ends, the queue
//! is split into a `QueueSender`/`QueueReceiver` pair the way
//! `crossbeam_channel` itself is, since that is the idiom the rest of this
//! workspace's `select!`-based cancellation (see [`crate::sequence`])
//! already depends on.
//!
//! Closing is entirely ownership-driven: a [`QueueSender::close`] enqueues
//! [`Item::End`] so the consumer drains it after every value already
//! queued; dropping every [`QueueReceiver`] clone disconnects the channel,
//! so a producer's next [`QueueSender::put`] fails immediately instead of
//! blocking forever on a consumer that is no longer listening.

use crate::item::Item;
use crossbeam_channel::{Receiver, SendError, Sender, bounded};

/// Producer-facing half of a [`BoundedQueue`](self).
#[derive(Clone)]
pub struct QueueSender<T> {
    tx: Sender<Item<T>>,
}

/// Consumer-facing half of a [`BoundedQueue`](self).
#[derive(Clone)]
pub struct QueueReceiver<T> {
    rx: Receiver<Item<T>>,
}

/// Create a bounded queue of the given capacity (clamped to at least 1, per
/// the `Q >= 1` invariant).
pub fn bounded_queue<T>(capacity: usize) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = bounded(capacity.max(1));
    (QueueSender { tx }, QueueReceiver { rx })
}

impl<T> QueueSender<T> {
    /// Blocking put. Returns the value back in `Err` without blocking
    /// further once every receiver has been dropped — callers should treat
    /// that as "this destination is closed", not as a fatal error.
    pub fn put(&self, value: T) -> Result<(), SendError<T>> {
        self.tx.send(Item::Value(value)).map_err(|e| match e.0 {
            Item::Value(v) => SendError(v),
            Item::End => unreachable!("put() never enqueues Item::End"),
        })
    }

    /// Declare this producer finished. Best-effort: if every receiver has
    /// already disconnected there is nothing left to notify, which is fine.
    pub fn close(&self) {
        let _ = self.tx.send(Item::End);
    }

    pub(crate) fn raw(&self) -> &Sender<Item<T>> {
        &self.tx
    }
}

impl<T> QueueReceiver<T> {
    /// Blocking take. `None` means end-of-queue, whether from an explicit
    /// [`QueueSender::close`] or because every sender was dropped.
    pub fn take(&self) -> Option<T> {
        match self.rx.recv() {
            Ok(Item::Value(v)) => Some(v),
            Ok(Item::End) | Err(_) => None,
        }
    }

    pub(crate) fn raw(&self) -> &Receiver<Item<T>> {
        &self.rx
    }
}
