//! Change notification for the connector service.
//!
//! Listeners run synchronously in registration order. Each call is wrapped
//! in its own panic boundary: a panicking listener is logged and skipped,
//! and the remaining listeners still run.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::de::DeserializeOwned;
use tracing::{error, trace};

use super::DataType;
use crate::error::Result;

/// A write to one of the shared collections.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Which collection changed.
    pub data_type: DataType,
    /// The complete collection after the write, as a JSON array.
    pub data: serde_json::Value,
}

impl ChangeEvent {
    /// Decode the collection into typed records.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// Number of records in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.as_array().map_or(0, Vec::len)
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Listener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

type Registry = Mutex<Vec<(u64, Listener)>>;

/// Registry of change listeners.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Registry>,
    next_id: Arc<AtomicU64>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn lock(registry: &Registry) -> MutexGuard<'_, Vec<(u64, Listener)>> {
    // A listener never runs while the lock is held, so the data cannot be
    // left half-updated; recover from poisoning instead of failing writes.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EventBus {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. The same closure may be registered many times.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, Arc::new(listener)));
        trace!("Registered change listener {}", id);
        Subscription {
            id,
            registry: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Deliver an event to every listener registered at the time of the call.
    ///
    /// Returns how many listeners completed without panicking.
    pub fn emit(&self, event: &ChangeEvent) -> usize {
        let snapshot: Vec<(u64, Listener)> = lock(&self.listeners).clone();
        let mut delivered = 0;
        for (id, listener) in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    let reason = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!(
                        "Change listener {} panicked on '{}' update: {}",
                        id, event.data_type, reason
                    );
                }
            }
        }
        delivered
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping the handle leaves the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Identifier assigned at registration.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener, returning whether it was still registered.
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut listeners = lock(&registry);
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != self.id);
        before != listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn event() -> ChangeEvent {
        ChangeEvent {
            data_type: DataType::Tickets,
            data: serde_json::json!([{"id": "1"}]),
        }
    }

    #[test]
    fn test_emit_reaches_all_in_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let seen = seen.clone();
            let _ = bus.subscribe(move |_| seen.lock().unwrap().push(tag));
        }

        assert_eq!(bus.emit(&event()), 3);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sub = bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&event());
        assert!(sub.unsubscribe());
        bus.emit(&event());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_same_listener_twice_runs_twice() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let listener = {
            let calls = calls.clone();
            move |_: &ChangeEvent| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        };
        let _a = bus.subscribe(listener.clone());
        let _b = bus.subscribe(listener);

        bus.emit(&event());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        crate::logging::init_test_logging();
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let _bad = bus.subscribe(|_| panic!("listener failure"));
        let counter = calls.clone();
        let _good = bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.emit(&event()), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_dispatch() {
        let bus = EventBus::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let inner = slot.clone();
        let sub = bus.subscribe(move |_| {
            if let Some(sub) = inner.lock().unwrap().take() {
                sub.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        bus.emit(&event());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe_after_bus_dropped() {
        let bus = EventBus::new();
        let sub = bus.subscribe(|_| {});
        drop(bus);
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn test_event_decode() {
        #[derive(serde::Deserialize)]
        struct Row {
            id: String,
        }
        let rows: Vec<Row> = event().decode().unwrap();
        assert_eq!(rows[0].id, "1");
        assert_eq!(event().len(), 1);
    }
}
