//! In-process origin storage with cross-context change events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::{ContextId, KeyValueStorage, StorageEvent};
use crate::error::StorageError;

/// Pending events kept per subscriber before older ones are dropped.
const EVENT_CAPACITY: usize = 64;

/// Storage shared by every context of one simulated origin.
///
/// Cloning is cheap and yields a handle to the same origin.
#[derive(Clone)]
pub struct MemoryStorage {
    shared: Arc<Shared>,
}

struct Shared {
    entries: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl MemoryStorage {
    /// Create an empty origin.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Open a new browsing context (tab) on this origin.
    #[must_use]
    pub fn open_context(&self) -> MemoryContext {
        MemoryContext {
            id: ContextId::new(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// One browsing context's view of a [`MemoryStorage`].
///
/// Writes made through a context are announced to every other context of
/// the origin, never to the writer itself.
#[derive(Clone)]
pub struct MemoryContext {
    id: ContextId,
    shared: Arc<Shared>,
}

impl MemoryContext {
    /// This context's id.
    #[must_use]
    pub const fn id(&self) -> ContextId {
        self.id
    }

    /// Subscribe to writes made by other contexts.
    ///
    /// Only writes performed after this call are delivered.
    #[must_use]
    pub fn events(&self) -> StorageEvents {
        StorageEvents {
            own: self.id,
            receiver: self.shared.events.subscribe(),
        }
    }
}

impl KeyValueStorage for MemoryContext {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .shared
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let old_value = {
            let mut entries = self
                .shared
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            entries.insert(key.to_owned(), value.to_owned())
        };

        // Rewriting an identical value is not a change.
        if old_value.as_deref() == Some(value) {
            return Ok(());
        }

        let event = StorageEvent {
            key: key.to_owned(),
            old_value,
            new_value: Some(value.to_owned()),
            source: self.id,
        };
        // No subscribers is fine: nobody else has the origin open.
        let _ = self.shared.events.send(event);
        Ok(())
    }
}

/// Stream of [`StorageEvent`]s written by other contexts.
pub struct StorageEvents {
    own: ContextId,
    receiver: broadcast::Receiver<StorageEvent>,
}

impl StorageEvents {
    /// Next pending event, without waiting.
    pub fn try_next(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.source == self.own => {}
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Storage events lagged; older changes dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next event. Returns `None` once every context is gone.
    pub async fn next(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.source == self.own => {}
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Storage events lagged; older changes dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_share_entries() {
        let origin = MemoryStorage::new();
        let a = origin.open_context();
        let b = origin.open_context();

        a.set_item("carrito", "[]").unwrap();
        assert_eq!(b.get_item("carrito").unwrap().as_deref(), Some("[]"));
        assert_eq!(b.get_item("other").unwrap(), None);
    }

    #[test]
    fn test_events_skip_own_writes() {
        let origin = MemoryStorage::new();
        let a = origin.open_context();
        let b = origin.open_context();
        let mut a_events = a.events();
        let mut b_events = b.events();

        a.set_item("carrito", "[1]").unwrap();

        assert!(a_events.try_next().is_none());
        let event = b_events.try_next().unwrap();
        assert_eq!(event.key, "carrito");
        assert_eq!(event.old_value, None);
        assert_eq!(event.new_value.as_deref(), Some("[1]"));
        assert_eq!(event.source, a.id());
        assert!(b_events.try_next().is_none());
    }

    #[test]
    fn test_identical_write_is_silent() {
        let origin = MemoryStorage::new();
        let a = origin.open_context();
        let mut b_events = origin.open_context().events();

        a.set_item("k", "v").unwrap();
        a.set_item("k", "v").unwrap();

        assert!(b_events.try_next().is_some());
        assert!(b_events.try_next().is_none());
    }

    #[test]
    fn test_write_without_subscribers_succeeds() {
        let origin = MemoryStorage::new();
        let a = origin.open_context();
        assert!(a.set_item("k", "v").is_ok());
    }

    #[tokio::test]
    async fn test_next_waits_for_other_context() {
        let origin = MemoryStorage::new();
        let a = origin.open_context();
        let mut b_events = origin.open_context().events();

        let writer = tokio::spawn(async move {
            a.set_item("carrito", "[]").unwrap();
        });
        let event = b_events.next().await.unwrap();
        writer.await.unwrap();

        assert_eq!(event.new_value.as_deref(), Some("[]"));
    }
}
