//! Transient user feedback after a cart mutation.

use std::sync::Arc;

use crate::config::ToastConfig;
use crate::document::Document;
use crate::scheduler::Scheduler;

/// Shows a short, self-dismissing message.
///
/// Failing to show the message is never an error for the caller.
pub trait Notifier {
    /// Surface `message` to the user.
    fn notify(&self, message: &str);
}

/// Toast element appended to the page.
///
/// The toast fades in shortly after insertion, stays visible for the
/// configured duration, then fades out and is removed.
pub struct ToastNotifier {
    config: ToastConfig,
    document: Arc<dyn Document>,
    scheduler: Arc<dyn Scheduler>,
}

impl ToastNotifier {
    /// Create a notifier that renders toasts into `document`.
    pub fn new(
        config: ToastConfig,
        document: Arc<dyn Document>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            config,
            document,
            scheduler,
        }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str) {
        let Some(toast) = self.document.append_element(&self.config.class, message) else {
            tracing::debug!(message, "No surface for toast");
            return;
        };

        let document = Arc::clone(&self.document);
        let show_class = self.config.show_class.clone();
        self.scheduler.schedule(
            self.config.show_delay,
            Box::new(move || document.add_class(toast, &show_class)),
        );

        let document = Arc::clone(&self.document);
        let scheduler = Arc::clone(&self.scheduler);
        let show_class = self.config.show_class.clone();
        let fade = self.config.fade;
        self.scheduler.schedule(
            self.config.duration,
            Box::new(move || {
                document.remove_class(toast, &show_class);
                scheduler.schedule(fade, Box::new(move || document.remove_element(toast)));
            }),
        );
    }
}

/// Reports messages through `tracing`, for pages nobody is looking at.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(message, "Cart notification");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::document::MemoryDocument;
    use crate::scheduler::ManualScheduler;

    fn notifier(document: &Arc<MemoryDocument>, scheduler: &Arc<ManualScheduler>) -> ToastNotifier {
        ToastNotifier::new(
            ToastConfig::default(),
            Arc::clone(document) as Arc<dyn Document>,
            Arc::clone(scheduler) as Arc<dyn Scheduler>,
        )
    }

    #[test]
    fn test_toast_lifecycle() {
        let document = Arc::new(MemoryDocument::new());
        let scheduler = Arc::new(ManualScheduler::new());

        notifier(&document, &scheduler).notify("Widget agregado al carrito");

        let toasts = document.find_all(".toast-cart");
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].text, "Widget agregado al carrito");
        assert!(!toasts[0].has_class("show"));

        scheduler.advance(Duration::from_millis(10));
        assert!(document.find_all(".toast-cart")[0].has_class("show"));

        scheduler.advance(Duration::from_millis(1990));
        let toasts = document.find_all(".toast-cart");
        assert_eq!(toasts.len(), 1);
        assert!(!toasts[0].has_class("show"));

        scheduler.advance(Duration::from_millis(300));
        assert!(document.find_all(".toast-cart").is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_overlapping_toasts_are_independent() {
        let document = Arc::new(MemoryDocument::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let notifier = notifier(&document, &scheduler);

        notifier.notify("uno");
        scheduler.advance(Duration::from_millis(1000));
        notifier.notify("dos");
        assert_eq!(document.find_all(".toast-cart").len(), 2);

        scheduler.advance(Duration::from_millis(1300));
        let remaining = document.find_all(".toast-cart");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "dos");
    }

    #[test]
    fn test_missing_body_is_silent() {
        let document = Arc::new(MemoryDocument::without_body());
        let scheduler = Arc::new(ManualScheduler::new());

        notifier(&document, &scheduler).notify("hola");

        assert_eq!(scheduler.pending(), 0);
    }
}
