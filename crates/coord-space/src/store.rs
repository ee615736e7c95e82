//! A versioned holder for the current view config
//!
//! The store swaps whole configs: a reader always sees either the previous
//! or the next complete config. Subscribers run synchronously after each
//! swap, in registration order, outside the state lock.

use crate::error::Result;
use crate::mutation::{Action, reduce};
use crate::view::ViewConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

type Listener = Arc<dyn Fn(&ViewConfig) + Send + Sync>;

/// Handle returned by [`CoordinationStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Key identifying a config supplied by a controlling caller.
#[derive(Debug, Clone, PartialEq)]
enum ExternalKey {
    Keyed(String),
    Content(ViewConfig),
}

struct StoreInner {
    state: RwLock<ViewConfig>,
    version: AtomicU64,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
    last_external: RwLock<Option<ExternalKey>>,
}

/// Shared store for one coordination space and its views.
///
/// Cloning the store clones the handle, not the state.
#[derive(Clone)]
pub struct CoordinationStore {
    inner: Arc<StoreInner>,
}

impl CoordinationStore {
    pub fn new(initial: ViewConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial),
                version: AtomicU64::new(0),
                listeners: RwLock::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
                last_external: RwLock::new(None),
            }),
        }
    }

    /// The current config.
    pub fn get_state(&self) -> ViewConfig {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of swaps performed so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Swap in a new config and notify subscribers.
    pub fn set_state(&self, next: ViewConfig) {
        {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = next.clone();
        }
        self.inner.version.fetch_add(1, Ordering::Release);
        self.notify(&next);
    }

    /// Reduce an action against the current config and swap in the result.
    ///
    /// A failing action leaves the state untouched and notifies nobody.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        let next = {
            let guard = self
                .inner
                .state
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            reduce(&guard, action)
        };
        match next {
            Ok(next) => {
                self.set_state(next);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejected coordination action");
                Err(e)
            }
        }
    }

    /// Replace the state with a caller-supplied config when it is new.
    ///
    /// With a key, the config is new when the key differs from the last
    /// supplied key. Without one, it is new when its content differs from
    /// the last supplied config. Returns whether a swap happened.
    pub fn replace_external(&self, config: ViewConfig, key: Option<&str>) -> bool {
        let incoming = match key {
            Some(key) => ExternalKey::Keyed(key.to_string()),
            None => ExternalKey::Content(config.clone()),
        };
        {
            let mut last = self
                .inner
                .last_external
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if last.as_ref() == Some(&incoming) {
                return false;
            }
            *last = Some(incoming);
        }
        tracing::debug!(?key, "Replacing coordination state with external config");
        self.set_state(config);
        true
    }

    /// Register a listener called after every swap.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ViewConfig) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn notify(&self, state: &ViewConfig) {
        // Snapshot so listeners may subscribe or dispatch re-entrantly.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }
}
