//! `carrito add` - click a buy control.

use std::path::Path;
use std::sync::Arc;

use carrito_widget::notifier::LogNotifier;
use carrito_widget::scheduler::TokioScheduler;
use carrito_widget::storage::FileStorage;
use carrito_widget::{BuyAttributes, CartWidget, StorageCartStore, WidgetConfig};

use super::{CliError, Page};

/// Load the page, click a buy control carrying `attributes` and return the
/// page as rendered afterwards. The confirmation goes to the log.
///
/// # Errors
///
/// Returns an error if the cart could not be persisted.
pub fn run(
    config: WidgetConfig,
    storage: &Path,
    attributes: &BuyAttributes,
) -> Result<Page, CliError> {
    let page = Page::with_buy_control(&config, attributes);
    let store = StorageCartStore::new(FileStorage::new(storage), config.storage_key.clone());
    let mut widget = CartWidget::new(
        config,
        store,
        page.document(),
        Arc::new(TokioScheduler),
        Box::new(LogNotifier),
    );
    widget.on_page_ready();

    if let Some(control) = page.buy_control() {
        widget.click(control)?;
    }
    Ok(page)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn buy(name: &str, price: &str, quantity: &str) -> BuyAttributes {
        BuyAttributes {
            name: Some(name.to_string()),
            price: Some(price.to_string()),
            quantity: Some(quantity.to_string()),
            image: None,
        }
    }

    #[test]
    fn test_add_persists_and_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carrito.json");

        let page = run(WidgetConfig::default(), &path, &buy("Widget", "1000", "2")).unwrap();

        assert_eq!(page.counter_text(), "2");
        assert!(page.summary_html().contains("Total: $2.000"));

        let stored = std::fs::read_to_string(&path).unwrap();
        assert!(stored.contains("carrito"));
    }

    #[test]
    fn test_repeated_adds_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carrito.json");

        run(WidgetConfig::default(), &path, &buy("Widget", "1000", "1")).unwrap();
        let page = run(WidgetConfig::default(), &path, &buy("Widget", "1000", "3")).unwrap();

        assert_eq!(page.counter_text(), "4");
        assert!(page.summary_html().contains("Cantidad: 4"));
    }

    #[test]
    fn test_unwritable_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("carrito.json");
        std::fs::create_dir(&path).unwrap();

        let result = run(WidgetConfig::default(), &path, &buy("Widget", "1", "1"));
        assert!(matches!(result, Err(CliError::Widget(_))));
    }
}
