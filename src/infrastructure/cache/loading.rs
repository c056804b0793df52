//! Registry of keys with an outstanding fetch

use std::collections::HashMap;

use tokio::sync::watch;

/// One in-flight key. Dropping `done` wakes every subscribed waiter.
#[derive(Debug)]
struct LoadingEntry {
    holders: usize,
    done: watch::Sender<()>,
}

/// Tracks which keys are currently being fetched
///
/// A key may be held by more than one fetch at a time (a forced refresh racing
/// a normal load, or a waiter that timed out and started its own fetch). The
/// key stays registered until the last holder releases it.
#[derive(Debug, Default)]
pub(crate) struct LoadingRegistry {
    entries: HashMap<String, LoadingEntry>,
}

impl LoadingRegistry {
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns a receiver that resolves once `key` leaves the registry
    pub(crate) fn subscribe(&self, key: &str) -> Option<watch::Receiver<()>> {
        self.entries.get(key).map(|entry| entry.done.subscribe())
    }

    pub(crate) fn acquire(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.holders += 1;
            return;
        }

        let (done, _) = watch::channel(());
        self.entries
            .insert(key.to_string(), LoadingEntry { holders: 1, done });
    }

    /// Drops one hold on `key`; returns true if the key is no longer loading
    pub(crate) fn release(&mut self, key: &str) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            return true;
        };

        entry.holders = entry.holders.saturating_sub(1);
        if entry.holders == 0 {
            self.entries.remove(key);
            return true;
        }

        false
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
