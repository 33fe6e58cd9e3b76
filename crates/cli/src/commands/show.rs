//! `carrito show` - render the persisted cart.

use std::path::Path;
use std::sync::Arc;

use carrito_widget::scheduler::TokioScheduler;
use carrito_widget::storage::FileStorage;
use carrito_widget::{CartWidget, WidgetConfig};

use super::Page;

/// Render the persisted cart into a fresh page.
pub fn run(config: WidgetConfig, storage: &Path) -> Page {
    let page = Page::new(&config);
    let mut widget = CartWidget::with_storage(
        config,
        FileStorage::new(storage),
        page.document(),
        Arc::new(TokioScheduler),
    );
    widget.on_page_ready();
    page
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_store_shows_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let page = run(WidgetConfig::default(), &dir.path().join("none.json"));

        assert_eq!(page.counter_text(), "0");
        assert!(page.summary_html().contains("Tu carrito está vacío."));
    }

    #[test]
    fn test_corrupt_cart_shows_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carrito.json");
        std::fs::write(&path, r#"{"carrito":"not json"}"#).unwrap();

        let page = run(WidgetConfig::default(), &path);

        assert_eq!(page.counter_text(), "0");
    }

    #[test]
    fn test_shows_persisted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carrito.json");
        std::fs::write(
            &path,
            r#"{"carrito":"[{\"nombre\":\"Taza\",\"precio\":2500,\"cantidad\":2}]"}"#,
        )
        .unwrap();

        let page = run(WidgetConfig::default(), &path);

        assert_eq!(page.counter_text(), "2");
        assert!(page.summary_html().contains("<strong>Taza</strong>"));
        assert!(page.summary_html().contains("Total: $5.000"));
    }
}
