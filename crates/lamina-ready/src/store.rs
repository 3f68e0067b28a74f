//! First-write-wins keyed store with deferred continuations.
//!
//! This is the readiness boundary for Lamina:
//! - `set` stores a value once per key
//! - `need`/`once` run a continuation when a key set is fully satisfied
//! - `each` visits the satisfied subset of a key list
//!
//! Single-threaded by construction: the store is a cheap handle over
//! `Rc<RefCell<...>>`, so continuations capture their own handle and may
//! re-enter the store freely. State is never borrowed across a
//! continuation call.

use crate::keys::NameList;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

type Continuation = Box<dyn FnOnce()>;

struct Wait {
    keys: Vec<String>,
    continuation: Continuation,
}

struct StoreState<V> {
    values: BTreeMap<String, V>,
    waits: Vec<Wait>,
    run_queue: VecDeque<Continuation>,
    dispatching: bool,
}

/// Keyed readiness store.
///
/// Values are stored once per key (first write is authoritative) and never
/// cleared. Waits registered against keys that are not yet all present
/// stay pending until the final missing key is stored, then run
/// synchronously inside that `set` call, in registration order.
pub struct ReadyStore<V> {
    state: Rc<RefCell<StoreState<V>>>,
}

impl<V> Clone for ReadyStore<V> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<V: Clone + 'static> Default for ReadyStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + 'static> ReadyStore<V> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                values: BTreeMap::new(),
                waits: Vec::new(),
                run_queue: VecDeque::new(),
                dispatching: false,
            })),
        }
    }

    /// Store `value` under `key`.
    ///
    /// The first write for a key is authoritative: a repeated `set` is
    /// ignored and returns `false`. A successful write enqueues every
    /// pending wait whose key set just became fully satisfied, then
    /// dispatches the queue (unless a dispatch is already running above
    /// this call, which will pick the queue up itself).
    pub fn set(&self, key: impl Into<String>, value: V) -> bool {
        let key = key.into();
        {
            let mut state = self.state.borrow_mut();
            if state.values.contains_key(&key) {
                return false;
            }
            state.values.insert(key, value);
            Self::queue_satisfied(&mut state);
        }
        self.drain();
        true
    }

    /// The stored value for `key`, or `None` while unset. Never blocks.
    pub fn get(&self, key: &str) -> Option<V> {
        self.state.borrow().values.get(key).cloned()
    }

    /// One slot per requested key, in request order.
    pub fn get_many(&self, keys: impl Into<NameList>) -> Vec<Option<V>> {
        let state = self.state.borrow();
        keys.into()
            .iter()
            .map(|key| state.values.get(key).cloned())
            .collect()
    }

    /// Run `continuation` exactly once, as soon as all of `keys` have
    /// values: synchronously before returning if they already do,
    /// otherwise inside whichever `set` supplies the final missing key.
    pub fn need(&self, keys: impl Into<NameList>, continuation: impl FnOnce() + 'static) {
        self.register_wait(keys.into(), Box::new(continuation));
    }

    /// The ready-notification flavor of [`need`](Self::need).
    ///
    /// Keys are never cleared from this store, so a satisfied watch cannot
    /// re-fire: it runs once per registration and is then released. The
    /// operation stays separate from `need` because it expresses
    /// observation rather than gating; a host that adds key invalidation
    /// would extend this path without touching `need` callers.
    pub fn once(&self, keys: impl Into<NameList>, continuation: impl FnOnce() + 'static) {
        self.register_wait(keys.into(), Box::new(continuation));
    }

    /// Invoke `visit(key, value)` for every requested key that currently
    /// has a value, in request order. Unset keys are skipped.
    pub fn each(&self, keys: impl Into<NameList>, mut visit: impl FnMut(&str, &V)) {
        let satisfied: Vec<(String, V)> = {
            let state = self.state.borrow();
            keys.into()
                .iter()
                .filter_map(|key| {
                    state
                        .values
                        .get(key)
                        .map(|value| (key.to_string(), value.clone()))
                })
                .collect()
        };
        for (key, value) in &satisfied {
            visit(key, value);
        }
    }

    /// Sorted keys that currently have values.
    pub fn ready_keys(&self) -> Vec<String> {
        self.state.borrow().values.keys().cloned().collect()
    }

    /// Number of keys with values.
    pub fn len(&self) -> usize {
        self.state.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().values.is_empty()
    }

    /// Number of registered waits that have not fired yet.
    pub fn pending_waits(&self) -> usize {
        self.state.borrow().waits.len()
    }

    fn register_wait(&self, keys: NameList, continuation: Continuation) {
        {
            let mut state = self.state.borrow_mut();
            let keys = keys.into_vec();
            if keys.iter().all(|key| state.values.contains_key(key)) {
                state.run_queue.push_back(continuation);
            } else {
                state.waits.push(Wait { keys, continuation });
            }
        }
        self.drain();
    }

    /// Move every satisfied wait to the run queue, preserving
    /// registration order among the remaining waits.
    fn queue_satisfied(state: &mut StoreState<V>) {
        let waits = std::mem::take(&mut state.waits);
        for wait in waits {
            if wait
                .keys
                .iter()
                .all(|key| state.values.contains_key(key))
            {
                state.run_queue.push_back(wait.continuation);
            } else {
                state.waits.push(wait);
            }
        }
    }

    /// Run queued continuations until the queue is empty.
    ///
    /// Re-entrant calls (a continuation calling `set` or registering a
    /// wait) see `dispatching` set and return immediately; the outermost
    /// drain picks up whatever they enqueued. No state borrow is held
    /// while a continuation runs.
    fn drain(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.dispatching {
                return;
            }
            state.dispatching = true;
        }
        loop {
            let next = self.state.borrow_mut().run_queue.pop_front();
            match next {
                Some(continuation) => continuation(),
                None => break,
            }
        }
        self.state.borrow_mut().dispatching = false;
    }
}
