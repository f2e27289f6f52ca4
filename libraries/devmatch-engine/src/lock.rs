//! Per-entity action locks
//!
//! A lock records that a mutating action is in flight for one entity id.
//! Acquisition is check-and-set under a mutex and hands back a guard; the
//! lock is released when the guard is dropped, on every exit path.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

struct Slot<V> {
    value: V,
    token: u64,
}

struct Table<K, V> {
    held: HashMap<K, Slot<V>>,
    next_token: u64,
}

/// Set of held locks keyed by entity id, each carrying a value
/// describing the action in flight.
pub struct ActionLocks<K, V = ()> {
    table: Arc<Mutex<Table<K, V>>>,
}

impl<K, V> Clone for ActionLocks<K, V> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Default for ActionLocks<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V> ActionLocks<K, V> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table {
                held: HashMap::new(),
                next_token: 0,
            })),
        }
    }

    /// Acquire the lock for `key`, recording `value` as the action in flight.
    ///
    /// Returns `None` if the lock is already held.
    pub fn try_acquire_with(&self, key: K, value: V) -> Option<ActionGuard<K, V>> {
        let mut table = self.table.lock();
        if table.held.contains_key(&key) {
            return None;
        }

        table.next_token += 1;
        let token = table.next_token;
        table.held.insert(key.clone(), Slot { value, token });

        Some(ActionGuard {
            key,
            token,
            table: Arc::clone(&self.table),
        })
    }

    pub fn is_held(&self, key: &K) -> bool {
        self.table.lock().held.contains_key(key)
    }

    /// Number of locks currently held
    pub fn len(&self) -> usize {
        self.table.lock().held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every lock.
    ///
    /// Guards issued before the clear become inert: dropping them does not
    /// release a lock acquired for the same key afterwards.
    pub fn clear(&self) {
        self.table.lock().held.clear();
    }
}

impl<K: Eq + Hash + Clone, V: Clone> ActionLocks<K, V> {
    /// The action in flight for `key`, if any
    pub fn get(&self, key: &K) -> Option<V> {
        self.table.lock().held.get(key).map(|slot| slot.value.clone())
    }
}

impl<K: Eq + Hash + Clone> ActionLocks<K, ()> {
    pub fn try_acquire(&self, key: K) -> Option<ActionGuard<K, ()>> {
        self.try_acquire_with(key, ())
    }
}

/// Scoped ownership of one action lock
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ActionGuard<K: Eq + Hash, V = ()> {
    key: K,
    token: u64,
    table: Arc<Mutex<Table<K, V>>>,
}

impl<K: Eq + Hash, V> ActionGuard<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash + fmt::Debug, V> fmt::Debug for ActionGuard<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionGuard").field("key", &self.key).finish()
    }
}

impl<K: Eq + Hash, V> Drop for ActionGuard<K, V> {
    fn drop(&mut self) {
        let mut table = self.table.lock();
        if table
            .held
            .get(&self.key)
            .is_some_and(|slot| slot.token == self.token)
        {
            table.held.remove(&self.key);
        }
    }
}
