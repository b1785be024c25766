//! Shared toast handle for browser code
//!
//! [`Toaster`] owns a [`NotificationManager`] over the real DOM and is cheap
//! to clone. Show calls never fail loudly: a DOM error is logged and the
//! toast is skipped.

use std::cell::RefCell;
use std::rc::Rc;

use toast_core::{NotificationManager, ToastBody, ToastId};
use toast_types::{Severity, ToastConfig, ToastOptions};
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::host::{Dispatcher, SharedManager, WebHost};

#[derive(Clone)]
pub struct Toaster {
    inner: SharedManager,
}

impl Toaster {
    pub fn new(config: ToastConfig) -> Self {
        Self::build(|host| NotificationManager::new(host, config))
    }

    /// Toasts attach to `attachment` instead of `document.body` while no
    /// dialog is open.
    pub fn with_attachment(config: ToastConfig, attachment: Element) -> Self {
        Self::build(|host| NotificationManager::new(host, config).with_attachment(attachment))
    }

    /// Build from a JS options object such as `{ display_time_ms: 5000 }`.
    /// `undefined` and `null` select the defaults.
    pub fn from_js(options: JsValue) -> Result<Self, serde_wasm_bindgen::Error> {
        let config = if options.is_undefined() || options.is_null() {
            ToastConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        Ok(Self::new(config))
    }

    fn build(make: impl FnOnce(WebHost) -> NotificationManager<WebHost>) -> Self {
        let dispatcher = Dispatcher::default();
        let inner = Rc::new(RefCell::new(make(WebHost::new(dispatcher.clone()))));
        dispatcher.connect(&inner);
        Self { inner }
    }

    pub fn success(
        &self,
        message: impl Into<ToastBody<Element>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Option<ToastId> {
        self.show(Severity::Success, message, title, options)
    }

    pub fn info(
        &self,
        message: impl Into<ToastBody<Element>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Option<ToastId> {
        self.show(Severity::Info, message, title, options)
    }

    pub fn warning(
        &self,
        message: impl Into<ToastBody<Element>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Option<ToastId> {
        self.show(Severity::Warning, message, title, options)
    }

    pub fn error(
        &self,
        message: impl Into<ToastBody<Element>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Option<ToastId> {
        self.show(Severity::Error, message, title, options)
    }

    /// Show a toast, returning its id, or `None` if it could not be shown.
    pub fn show(
        &self,
        severity: Severity,
        message: impl Into<ToastBody<Element>>,
        title: Option<&str>,
        options: ToastOptions,
    ) -> Option<ToastId> {
        let Ok(mut manager) = self.inner.try_borrow_mut() else {
            warn!(%severity, "Toast requested while the manager was busy");
            return None;
        };
        match manager.show(severity, message.into(), title, options) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(%severity, error = %err, "Failed to show toast");
                None
            }
        }
    }

    /// Remove a toast now. Returns false if it is already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        self.inner
            .try_borrow_mut()
            .map(|mut manager| manager.dismiss(id))
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        if let Ok(mut manager) = self.inner.try_borrow_mut() {
            manager.clear();
        }
    }

    /// Manager configuration in effect
    pub fn config(&self) -> ToastConfig {
        self.inner
            .try_borrow()
            .map(|manager| manager.config().clone())
            .unwrap_or_default()
    }

    pub fn visible_count(&self) -> usize {
        self.inner
            .try_borrow()
            .map(|manager| manager.visible_count())
            .unwrap_or(0)
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(ToastConfig::default())
    }
}
