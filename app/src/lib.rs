//! Browser backend for toast-core
//!
//! [`Toaster`] drives toasts in the live DOM; enable the `dioxus` feature for
//! context hooks.

mod host;
mod toaster;

#[cfg(feature = "dioxus")]
pub mod hooks;

pub use host::WebHost;
pub use toast_core::{HostError, ToastBody, ToastId};
pub use toast_types::{Severity, ToastConfig, ToastOptions};
pub use toaster::Toaster;
