/// Addressed messages between scene objects and the per-recipient
/// pending queues that hold them until the recipient registers.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use rustc_hash::FxHashMap;

/// Type-erased, cheaply cloneable message body
#[derive(Clone)]
pub struct Payload(Arc<dyn Any + Send + Sync>);

impl Payload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    /// Sender name
    pub from: String,
    /// Recipient name (lookup key only)
    pub to: String,
    pub payload: Payload,
}

impl Message {
    pub fn new(from: &str, to: &str, payload: Payload) -> Self {
        Self { from: from.to_string(), to: to.to_string(), payload }
    }

    /// Shorthand for `self.payload.downcast_ref()`
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

/// Messages addressed to names that are not registered yet.
///
/// Insertion order is preserved per recipient; `take` consumes the whole
/// queue so each message is delivered at most once.
#[derive(Debug, Default)]
pub struct MessageQueue {
    queues: FxHashMap<String, VecDeque<Message>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.queues.entry(message.to.clone()).or_default().push_back(message);
    }

    /// Remove and return every message held for `recipient`
    pub fn take(&mut self, recipient: &str) -> VecDeque<Message> {
        self.queues.remove(recipient).unwrap_or_default()
    }

    pub fn pending_for(&self, recipient: &str) -> usize {
        self.queues.get(recipient).map_or(0, VecDeque::len)
    }

    pub fn total(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
