//! Application contract.
//!
//! The windowed runtime owns the platform loop and the renderer; applications
//! plug in through [`App`] to register drawables and observe window events.

mod app;

pub use app::{App, AppControl};
