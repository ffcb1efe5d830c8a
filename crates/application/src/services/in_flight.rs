//! Per-key request coalescing
//!
//! Concurrent identical lookups wait on a shared gate so that only the
//! first one reaches upstream; the others re-read the cache once it is
//! released.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-key async gates
#[derive(Debug, Default)]
pub struct InFlightGate {
    gates: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl InFlightGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other holder of `key` is active, then hold it
    pub async fn acquire(&self, key: &str) -> InFlightGuard<'_> {
        let gate = {
            let mut gates = self.gates.lock();
            Arc::clone(gates.entry(key.to_string()).or_default())
        };
        let held = Arc::clone(&gate).lock_owned().await;
        InFlightGuard {
            owner: self,
            key: key.to_string(),
            gate,
            held: Some(held),
        }
    }

    /// Number of keys with an active or waiting holder
    #[must_use]
    pub fn active(&self) -> usize {
        self.gates.lock().len()
    }
}

/// Held gate; released on drop
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlightGate,
    key: String,
    gate: Arc<AsyncMutex<()>>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        drop(self.held.take());
        let mut gates = self.owner.gates.lock();
        // Registry entry plus ours: nobody else is waiting.
        if Arc::strong_count(&self.gate) <= 2 {
            gates.remove(&self.key);
        }
    }
}
