//! `Config`: the recognized options table from the design, represented as
//! a single record with defaults rather than a chained builder. The
//! `with_*` setters are ergonomic sugar over the record, not a builder
//! type of their own.

use lineflow_core::queue::bounded_queue;
use lineflow_core::{Item, LineConsumer, LineSequence};
use std::sync::Arc;

/// Platform character set used to decode/encode a process's three
/// streams. Only UTF-8 is supported; a richer encoding selection is an
/// external collaborator this core does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
}

/// A stream transform: `None` drops the line, `Some(line)` passes a
/// (possibly rewritten) line through to the consumer.
pub type LineTransformer = Box<dyn Fn(String) -> Option<String> + Send + Sync>;

/// The options table a [`crate::ProcessHandle`] is built from.
pub struct Config {
    /// Lines fed to the child's stdin. An end-of-sequence sentinel is
    /// always appended by the stdin route so the child sees EOF once this
    /// sequence ends, regardless of what it contains.
    pub stdin: Arc<LineSequence>,
    /// Encoding for all three streams.
    pub charset: Charset,
    /// Applied to the child's stdout line sequence before `stdout_consumer`.
    pub stdout_transformer: LineTransformer,
    /// Terminal sink for stdout lines; marks the selector's critical route.
    pub stdout_consumer: LineConsumer,
    /// Applied to stderr. Defaults to dropping every line.
    pub stderr_transformer: LineTransformer,
    /// Terminal sink for stderr lines; marks a non-critical route.
    pub stderr_consumer: LineConsumer,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stdin: empty_sequence(),
            charset: Charset::default(),
            stdout_transformer: Box::new(Some),
            stdout_consumer: no_op_consumer(),
            stderr_transformer: Box::new(|_| None),
            stderr_consumer: no_op_consumer(),
        }
    }
}

impl Config {
    pub fn with_stdin(mut self, stdin: Arc<LineSequence>) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_stdout_transformer(mut self, transformer: LineTransformer) -> Self {
        self.stdout_transformer = transformer;
        self
    }

    pub fn with_stdout_consumer(mut self, consumer: LineConsumer) -> Self {
        self.stdout_consumer = consumer;
        self
    }

    pub fn with_stderr_transformer(mut self, transformer: LineTransformer) -> Self {
        self.stderr_transformer = transformer;
        self
    }

    pub fn with_stderr_consumer(mut self, consumer: LineConsumer) -> Self {
        self.stderr_consumer = consumer;
        self
    }
}

fn no_op_consumer() -> LineConsumer {
    Box::new(|_item: Item<String>| {})
}

fn empty_sequence() -> Arc<LineSequence> {
    let (tx, rx) = bounded_queue(1);
    tx.close();
    Arc::new(LineSequence::new(rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stdin_is_already_at_end() {
        let config = Config::default();
        assert_eq!(config.stdin.recv(), None);
    }

    #[test]
    fn default_stdout_transformer_is_identity() {
        let config = Config::default();
        assert_eq!((config.stdout_transformer)("hi".to_string()), Some("hi".to_string()));
    }

    #[test]
    fn default_stderr_transformer_drops_everything() {
        let config = Config::default();
        assert_eq!((config.stderr_transformer)("noisy".to_string()), None);
    }

    #[test]
    fn with_stdout_consumer_replaces_the_default_no_op() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        let mut config = Config::default().with_stdout_consumer(Box::new(move |item| {
            if let Some(line) = item.into_value() {
                sink.lock().unwrap().push(line);
            }
        }));
        (config.stdout_consumer)(Item::Value("hello".to_string()));
        assert_eq!(*seen.lock().unwrap(), vec!["hello"]);
    }
}
