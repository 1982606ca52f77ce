//! The tagged end-of-sequence marker.
//!
//! The source this design comes from reuses a `null` line value as the
//! end-of-sequence sentinel on every queue and consumer. That is ambiguous
//! the moment `T` could legally be empty or absent, so every queue and
//! consumer contract in this workspace speaks in terms of `Item<T>`
//! instead: a value, or the producer's explicit declaration that it is
//! finished.

/// One slot in a line-oriented channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<T> {
    /// A produced value.
    Value(T),
    /// The producer is finished; no more values will follow.
    End,
}

impl<T> Item<T> {
    /// Discard the end-of-sequence case, turning `Item<T>` into the
    /// `Option<T>` most call sites actually want.
    pub fn into_value(self) -> Option<T> {
        match self {
            Item::Value(v) => Some(v),
            Item::End => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Item::End)
    }

    pub fn as_ref(&self) -> Item<&T> {
        match self {
            Item::Value(v) => Item::Value(v),
            Item::End => Item::End,
        }
    }
}

impl<T> From<Option<T>> for Item<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Item::Value(v),
            None => Item::End,
        }
    }
}
