//! CLI subcommands.

use carrito_widget::{StorageError, WidgetError};
use thiserror::Error;

pub mod add;
pub mod page;
pub mod show;
pub mod watch;

pub use page::Page;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The cart could not be persisted.
    #[error(transparent)]
    Widget(#[from] WidgetError),

    /// The store file could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Waiting for the interrupt signal failed.
    #[error("Signal handling error: {0}")]
    Signal(#[from] std::io::Error),
}

/// Print the page surfaces.
#[allow(clippy::print_stdout)]
pub fn print_page(page: &Page) {
    println!("{}", page.to_text());
}
