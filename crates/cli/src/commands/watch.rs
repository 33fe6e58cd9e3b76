//! `carrito watch` - follow changes made by other processes.
//!
//! Another process writing the store file is the CLI's equivalent of another
//! tab writing `localStorage`: each observed change is delivered to the
//! widget as a storage event.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use carrito_widget::scheduler::TokioScheduler;
use carrito_widget::storage::{FileStorage, KeyValueStorage, StorageEvent};
use carrito_widget::{CartWidget, WidgetConfig};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::{CliError, Page, print_page};

/// Poll the store file every `interval` until interrupted, re-rendering
/// after each change to the cart entry.
///
/// # Errors
///
/// Returns an error if the store file cannot be read initially or the
/// interrupt handler cannot be installed.
pub async fn run(config: WidgetConfig, storage: &Path, interval: Duration) -> Result<(), CliError> {
    let key = config.storage_key.clone();
    let page = Page::new(&config);
    let mut widget = CartWidget::with_storage(
        config,
        FileStorage::new(storage),
        page.document(),
        Arc::new(TokioScheduler),
    );
    widget.on_page_ready();
    print_page(&page);

    let mut last = widget.store().storage().get_item(&key)?;
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(path = %storage.display(), "Watching cart");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = poll(widget.store().storage(), &key, &mut last) {
                    if widget.on_storage_event(&event) {
                        print_page(&page);
                    }
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Stopped watching cart");
                return Ok(());
            }
        }
    }
}

/// Read the entry under `key`, returning an event if it differs from `last`.
fn poll(storage: &FileStorage, key: &str, last: &mut Option<String>) -> Option<StorageEvent> {
    let current = match storage.get_item(key) {
        Ok(current) => current,
        Err(e) => {
            warn!(error = %e, "Failed to read store file");
            return None;
        }
    };
    if current == *last {
        return None;
    }
    let old = std::mem::replace(last, current.clone());
    Some(StorageEvent::external(key, old, current))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_reports_changes_once() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("carrito.json"));
        let mut last = None;

        assert!(poll(&storage, "carrito", &mut last).is_none());

        storage.set_item("carrito", "[]").unwrap();
        let event = poll(&storage, "carrito", &mut last).unwrap();
        assert_eq!(event.key, "carrito");
        assert_eq!(event.old_value, None);
        assert_eq!(event.new_value.as_deref(), Some("[]"));
        assert_eq!(last.as_deref(), Some("[]"));

        assert!(poll(&storage, "carrito", &mut last).is_none());
    }

    #[test]
    fn test_poll_ignores_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("carrito.json"));
        let mut last = None;

        storage.set_item("tema", "oscuro").unwrap();
        assert!(poll(&storage, "carrito", &mut last).is_none());
    }
}
