use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A plain callback registry, so any UI layer can bind to state changes
/// without committing to one reactive framework.
///
/// Callbacks are invoked synchronously after each state change, outside
/// the owner's state lock; a callback may unsubscribe or read the owner
/// without deadlocking.
pub struct Subscribers<T: ?Sized> {
    entries: Mutex<Vec<(u64, Arc<dyn Fn(&T) + Send + Sync>)>>,
    next_id: AtomicU64,
}

impl<T: ?Sized> std::fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.lock().map(|e| e.len()).unwrap_or(0);
        f.debug_struct("Subscribers").field("count", &count).finish()
    }
}

impl<T: ?Sized> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn add<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((id, Arc::new(callback)));
        }
        SubscriptionId(id)
    }

    /// Returns `true` if the subscription existed.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|(sub_id, _)| *sub_id != id.0);
                entries.len() != before
            }
            Err(_) => false,
        }
    }

    /// Invoke every callback with `value`. The registry lock is released
    /// before any callback runs.
    pub fn notify(&self, value: &T) {
        let callbacks: Vec<Arc<dyn Fn(&T) + Send + Sync>> = match self.entries.lock() {
            Ok(entries) => entries.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            Err(_) => return,
        };
        for callback in callbacks {
            callback(value);
        }
    }
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}
