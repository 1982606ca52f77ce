//! `LineIO`: adapt raw byte streams to and from lazy line sequences.
//!
//! [`reader_to_sequence`] spawns a dedicated pump thread that reads
//! complete lines from a byte source and feeds them into a
//! [`LineSequence`]; [`writer_consumer`] builds the inverse, a line
//! consumer that writes each accepted line (followed by a newline, then
//! flushed) to a byte sink and closes the sink once it receives
//! [`Item::End`].

use crate::item::Item;
use crate::queue::bounded_queue;
use crate::sequence::LineSequence;
use std::io::{BufRead, BufReader, Read, Write};
use std::thread;

/// A terminal sink for a line sequence: `Item::Value` lines are written
/// out, `Item::End` closes the sink. Boxed so routes (see
/// `lineflow-selector`) can store heterogeneous consumers uniformly.
pub type LineConsumer = Box<dyn FnMut(Item<String>) + Send>;

/// Wrap a byte source as a lazy [`LineSequence`].
///
/// A pump thread reads one buffered line per iteration and enqueues it;
/// the thread exits on EOF, on a read error, or as soon as the sequence is
/// closed (a `put` against a closed destination fails immediately rather
/// than blocking, so the pump does not linger once nobody is listening).
pub fn reader_to_sequence<R>(reader: R, queue_capacity: usize) -> LineSequence
where
    R: Read + Send + 'static,
{
    let (tx, rx) = bounded_queue::<String>(queue_capacity);

    thread::spawn(move || {
        let mut buffered = BufReader::new(reader);
        loop {
            let mut line = String::new();
            match buffered.read_line(&mut line) {
                Ok(0) => break, // EOF
                Ok(_) => {
                    strip_trailing_newline(&mut line);
                    if tx.put(line).is_err() {
                        break; // consumer closed; stop pumping
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "line reader stopped on I/O error");
                    break;
                }
            }
        }
        tx.close();
    });

    LineSequence::new(rx)
}

fn strip_trailing_newline(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

/// Build a line consumer that writes each line to `sink`, followed by a
/// newline, flushing after every write. Accepting [`Item::End`] drops
/// (and so closes) the sink; accepting further items after that is a
/// harmless no-op.
pub fn writer_consumer<W>(sink: W) -> LineConsumer
where
    W: Write + Send + 'static,
{
    let mut sink = Some(sink);
    Box::new(move |item| match item {
        Item::Value(line) => {
            if let Some(w) = sink.as_mut() {
                let result = writeln!(w, "{line}").and_then(|_| w.flush());
                if let Err(e) = result {
                    tracing::warn!(error = %e, "failed writing line to sink");
                    sink = None;
                }
            }
        }
        Item::End => sink = None,
    })
}
