use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[cfg(feature = "tokio")]
use futures_util::{stream::BoxStream, StreamExt};
use serde::Deserialize;
#[cfg(feature = "tokio")]
use tokio::sync::broadcast;
#[cfg(feature = "tokio")]
use tracing::warn;
use tracing::{debug, trace};

use crate::{reduce, Action, ApplicationState, GenericConfig};

type Listener = Arc<dyn Fn(&Arc<ApplicationState>) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of snapshots buffered for each subscriber of [`Store::changes`]
    pub change_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            change_capacity: 16,
        }
    }
}

impl<'a> From<&'a GenericConfig> for StoreConfig {
    fn from(value: &'a GenericConfig) -> Self {
        let mut config: StoreConfig = value.get_or_default("store");
        config.change_capacity = config.change_capacity.max(1);
        config
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

struct StoreInner {
    state: Mutex<Arc<ApplicationState>>,
    listeners: Mutex<Listeners>,
    #[cfg(feature = "tokio")]
    changes: broadcast::Sender<Arc<ApplicationState>>,
}

/// Owns the [`ApplicationState`] and applies [`Action`]s to it.
///
/// Cloning is cheap and every clone refers to the same state. Readers only ever get immutable
/// snapshots. Dispatching from within a listener is not supported: the nested notifications
/// would reach the remaining listeners before the outer ones.
#[derive(Clone)]
pub struct Store(Arc<StoreInner>);

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Debug for Store {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*lock(&self.0.state))
            .field("listeners", &lock(&self.0.listeners).entries.len())
            .finish()
    }
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        #[cfg(feature = "tokio")]
        let (changes, _) = broadcast::channel(config.change_capacity.max(1));
        #[cfg(not(feature = "tokio"))]
        let _ = config;

        Self(Arc::new(StoreInner {
            state: Mutex::new(ApplicationState::initial()),
            listeners: Default::default(),
            #[cfg(feature = "tokio")]
            changes,
        }))
    }

    pub fn get_state(&self) -> Arc<ApplicationState> {
        lock(&self.0.state).clone()
    }

    /// Applies `action` and notifies all listeners afterwards, even if the state didn't change.
    pub fn dispatch(&self, action: Action) {
        let next = {
            let mut state = lock(&self.0.state);
            let next = reduce(&state, action);
            *state = next.clone();
            // Sent under the lock, so the last snapshot on the stream is the current state
            #[cfg(feature = "tokio")]
            if self.0.changes.send(next.clone()).is_err() {
                trace!("No one listens for changes");
            }
            next
        };

        // No lock is held while listeners run, so they may read the state or subscribe
        let listeners = lock(&self.0.listeners)
            .entries
            .iter()
            .map(|(_, l)| l.clone())
            .collect::<Vec<_>>();
        trace!("Notify {} listeners", listeners.len());
        for listener in listeners {
            (listener)(&next);
        }
    }

    /// The listener stays registered until [`Subscription::unsubscribe`] is called.
    /// Dropping the subscription does not unregister it.
    pub fn subscribe(
        &self,
        listener: impl Fn(&Arc<ApplicationState>) + Send + Sync + 'static,
    ) -> Subscription {
        let mut listeners = lock(&self.0.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        debug!("Add listener {id}");

        Subscription {
            id,
            store: Arc::downgrade(&self.0),
        }
    }

    /// Streams the state after each dispatch, starting with the next one.
    ///
    /// Subscribers which fall behind by more than `change_capacity` snapshots skip the oldest
    /// ones. As each snapshot is complete, the latest one is always sufficient.
    #[cfg(feature = "tokio")]
    pub fn changes(&self) -> BoxStream<'static, Arc<ApplicationState>> {
        tokio_stream::wrappers::BroadcastStream::new(self.0.changes.subscribe())
            .filter_map(|x| async move {
                match x {
                    Ok(state) => Some(state),
                    Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                        warn!("Change subscriber missed {n} states");
                        None
                    }
                }
            })
            .boxed()
    }
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// Returns false, if the listener was already gone together with its store
    pub fn unsubscribe(self) -> bool {
        let Some(store) = self.store.upgrade() else {
            return false;
        };
        let mut listeners = lock(&store.listeners);
        let before = listeners.entries.len();
        listeners.entries.retain(|(id, _)| *id != self.id);
        debug!("Remove listener {}", self.id);
        before != listeners.entries.len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    #[test]
    fn dispatch_replaces_state() {
        let store = Store::default();
        let before = store.get_state();
        store.dispatch(Action::UpdateName("Pancakes".into()));
        let after = store.get_state();

        assert_eq!(before.name, "");
        assert_eq!(after.name, "Pancakes");
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn unrecognized_action_keeps_snapshot() {
        let store = Store::default();
        let before = store.get_state();
        store.dispatch(Action::Unrecognized("NOPE".into()));
        assert!(Arc::ptr_eq(&before, &store.get_state()));
    }

    #[test]
    fn clones_share_state() {
        let store = Store::default();
        let clone = store.clone();
        clone.dispatch(Action::AddRecipe);
        assert_eq!(store.get_state().recipes.len(), 4);
    }

    #[test]
    fn listener_is_called_after_each_dispatch() {
        let store = Store::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let _subscription = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(Action::AddIngredient("salt".into()));
        store.dispatch(Action::Unrecognized("NOPE".into()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn listener_receives_new_state() {
        let store = Store::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let reader = store.clone();
        store.subscribe(move |state| {
            assert!(Arc::ptr_eq(state, &reader.get_state()));
            seen_clone.lock().unwrap().push(state.ingredients.len());
        });

        store.dispatch(Action::AddIngredient("salt".into()));
        store.dispatch(Action::AddIngredient("pepper".into()));
        assert_eq!(*seen.lock().unwrap(), [2, 3]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = Store::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let subscription = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        store.dispatch(Action::AddRecipe);
        assert!(subscription.unsubscribe());
        store.dispatch(Action::AddRecipe);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_after_store_is_gone() {
        let store = Store::default();
        let subscription = store.subscribe(|_| {});
        drop(store);
        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn listener_may_subscribe() {
        let store = Store::default();
        let inner_store = store.clone();
        store.subscribe(move |_| {
            inner_store.subscribe(|_| {});
        });
        store.dispatch(Action::AddRecipe);
        assert_eq!(lock(&store.0.listeners).entries.len(), 2);
    }

    #[test]
    fn config_from_generic_config() {
        let generic = GenericConfig::mock(json!({ "store": { "change_capacity": 3 } }));
        assert_eq!(StoreConfig::from(&generic).change_capacity, 3);

        let generic = GenericConfig::mock(json!({ "store": { "change_capacity": 0 } }));
        assert_eq!(StoreConfig::from(&generic).change_capacity, 1);

        let generic = GenericConfig::mock(json!({}));
        assert_eq!(StoreConfig::from(&generic), StoreConfig::default());
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn changes_yield_each_dispatch() {
        let store = Store::default();
        let mut changes = store.changes();
        store.dispatch(Action::UpdateCategory("dinner".into()));
        store.dispatch(Action::AddRecipe);

        let first = changes.next().await.unwrap();
        let second = changes.next().await.unwrap();
        assert_eq!(first.category, "dinner");
        assert_eq!(first.recipes.len(), 3);
        assert_eq!(second.recipes.len(), 4);
        assert!(Arc::ptr_eq(&second, &store.get_state()));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn lagging_changes_skip_old_states() {
        let store = Store::new(StoreConfig { change_capacity: 1 });
        let mut changes = store.changes();
        store.dispatch(Action::AddIngredient("a".into()));
        store.dispatch(Action::AddIngredient("b".into()));

        let latest = changes.next().await.unwrap();
        assert_eq!(latest.ingredients.last().map(String::as_str), Some("b"));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn last_change_is_current_state_with_concurrent_dispatch() {
        let store = Store::new(StoreConfig {
            change_capacity: 128,
        });
        let mut changes = store.changes();

        let threads = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.dispatch(Action::AddIngredient(format!("{t}-{i}")));
                    }
                })
            })
            .collect::<Vec<_>>();
        for thread in threads {
            thread.join().unwrap();
        }

        let mut last = None;
        for _ in 0..100 {
            last = changes.next().await;
        }
        let last = last.unwrap();
        assert_eq!(last.ingredients.len(), 101);
        assert!(Arc::ptr_eq(&last, &store.get_state()));
    }
}
