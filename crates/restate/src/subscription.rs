//! Subscriber bookkeeping
//!
//! Subscribers are kept in registration order and keyed by a
//! [`SubscriptionId`] token handed back from `subscribe`.

use std::fmt;

/// A boxed subscriber callback
pub(crate) type Subscriber<S> = Box<dyn FnMut(&S) -> anyhow::Result<()> + Send>;

/// Opaque token identifying one registered subscriber
///
/// Tokens are never reused within a store, so redeeming a stale token
/// cannot remove a newer subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered list of subscribers
pub(crate) struct Subscriptions<S> {
    entries: Vec<(SubscriptionId, Subscriber<S>)>,
    next_id: u64,
}

impl<S> Subscriptions<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn insert(&mut self, subscriber: Subscriber<S>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, subscriber));
        id
    }

    /// Remove the subscriber registered under `id`
    ///
    /// Returns `false` when `id` is unknown or was already removed.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Notify every subscriber in order, stopping at the first failure
    pub fn notify(&mut self, state: &S) -> Result<(), (SubscriptionId, anyhow::Error)> {
        for (id, subscriber) in &mut self.entries {
            subscriber(state).map_err(|e| (*id, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Subscriber<i32> {
        let log = Arc::clone(log);
        Box::new(move |state| {
            log.lock().unwrap().push(format!("{name}:{state}"));
            Ok(())
        })
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut subs: Subscriptions<i32> = Subscriptions::new();
        let a = subs.insert(Box::new(|_| Ok(())));
        assert!(subs.remove(a));
        let b = subs.insert(Box::new(|_| Ok(())));
        assert_ne!(a, b);
        assert!(!subs.remove(a));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn test_notify_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subs = Subscriptions::new();
        subs.insert(recorder(&log, "first"));
        let middle = subs.insert(recorder(&log, "middle"));
        subs.insert(recorder(&log, "last"));
        subs.remove(middle);

        subs.notify(&7).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first:7", "last:7"]);
    }

    #[test]
    fn test_notify_stops_at_first_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subs: Subscriptions<i32> = Subscriptions::new();
        let failing = subs.insert(Box::new(|_| anyhow::bail!("subscriber down")));
        subs.insert(recorder(&log, "after"));

        let (id, err) = subs.notify(&1).unwrap_err();

        assert_eq!(id, failing);
        assert_eq!(err.to_string(), "subscriber down");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        let mut subs: Subscriptions<i32> = Subscriptions::new();
        subs.insert(Box::new(|_| Ok(())));
        let id = subs.insert(Box::new(|_| Ok(())));
        assert_eq!(id.to_string(), "#1");
    }
}
