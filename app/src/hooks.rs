//! Dioxus context hooks
//!
//! Call [`use_toaster_provider`] once near the root and [`use_toaster`] from
//! any descendant.

use dioxus::prelude::*;
use toast_types::ToastConfig;

use crate::Toaster;

/// Provide a [`Toaster`] to the component tree
pub fn use_toaster_provider(config: ToastConfig) -> Toaster {
    use_context_provider(move || Toaster::new(config))
}

/// Get the [`Toaster`] provided by an ancestor
pub fn use_toaster() -> Toaster {
    use_context::<Toaster>()
}
