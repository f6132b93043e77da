//! Synchronous publish/subscribe for store and filter snapshots
//!
//! Replaces framework-provided reactivity with an explicit observable:
//! subscribers are invoked synchronously, in no particular order, with a
//! full snapshot on every change. Callbacks must not subscribe or
//! unsubscribe from inside a notification.

use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

/// A set of snapshot callbacks, keyed by subscription token.
pub struct Subscribers<T> {
    callbacks: RwLock<HashMap<Uuid, Box<dyn Fn(&T) + Send + Sync>>>,
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Register a callback; returns a token for `unsubscribe`.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = Uuid::new_v4();
        self.callbacks
            .write()
            .expect("subscriber lock poisoned")
            .insert(id, Box::new(callback));
        SubscriptionId(id)
    }

    /// Remove a callback. Returns false if the token was already gone.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.callbacks
            .write()
            .expect("subscriber lock poisoned")
            .remove(&id.0)
            .is_some()
    }

    /// Invoke every callback synchronously with the given snapshot.
    pub fn notify(&self, snapshot: &T) {
        let callbacks = self.callbacks.read().expect("subscriber lock poisoned");
        for callback in callbacks.values() {
            callback(snapshot);
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.callbacks
            .read()
            .expect("subscriber lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.len())
            .finish()
    }
}
