//! Change notifications.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);

/// Handle returned by [`ChangeEvent::subscribe`], used to unsubscribe.
///
/// Ids are unique across every event in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ChangeCallback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Subscribers to one kind of value change, called in subscription order.
pub struct ChangeEvent<T> {
    subscribers: Vec<(SubscriptionId, ChangeCallback<T>)>,
}

impl<T> Default for ChangeEvent<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for ChangeEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEvent")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: Clone> ChangeEvent<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        self.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Returns whether a subscriber was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn emit(&self, value: T) {
        for (_, callback) in &self.subscribers {
            callback(value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn emit_reaches_subscribers_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut event = ChangeEvent::new();

        let first = Arc::clone(&seen);
        event.subscribe(move |v: bool| first.lock().unwrap().push(("first", v)));
        let second = Arc::clone(&seen);
        event.subscribe(move |v: bool| second.lock().unwrap().push(("second", v)));

        assert_eq!(event.len(), 2);
        event.emit(true);
        assert_eq!(*seen.lock().unwrap(), vec![("first", true), ("second", true)]);
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let seen = Arc::new(Mutex::new(0));
        let mut event = ChangeEvent::new();
        let counter = Arc::clone(&seen);
        let id = event.subscribe(move |_: bool| *counter.lock().unwrap() += 1);

        event.emit(false);
        assert!(event.unsubscribe(id));
        assert!(!event.unsubscribe(id));
        event.emit(false);

        assert_eq!(*seen.lock().unwrap(), 1);
        assert!(event.is_empty());
    }
}
