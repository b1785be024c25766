//! Shared configuration types for the toast notification manager
//!
//! This crate contains serializable configuration types that are shared between
//! the host-agnostic core (toast-core) and the WASM frontend (toast-web).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Severity
// ─────────────────────────────────────────────────────────────────────────────

/// Severity of a toast. Rendered as a CSS class on the toast element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// All severities in display order.
    pub const ALL: [Severity; 4] = [
        Severity::Success,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// CSS class applied to the toast element (e.g. `toast success`)
    pub fn class_name(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.class_name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Manager Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Default visible time before a toast starts fading
pub const DEFAULT_DISPLAY_TIME_MS: u64 = 3000;
/// Default duration of the fade-out transition
pub const DEFAULT_FADE_TIME_MS: u64 = 2000;
/// Default class of the shared container element
pub const DEFAULT_ROOT_CLASS: &str = "toast-root";
/// Default class of the per-toast content wrapper
pub const DEFAULT_CONTENT_CLASS: &str = "toast-content";

/// Manager-wide toast configuration.
///
/// Missing fields fall back to the built-in defaults when deserializing, so a
/// partial TOML or JS options object is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastConfig {
    /// How long a toast stays fully visible. `0` disables fading and
    /// auto-removal: the toast stays until it is clicked.
    #[serde(default = "default_display_time_ms")]
    pub display_time_ms: u64,
    /// Duration of the fade-out transition before removal
    #[serde(default = "default_fade_time_ms")]
    pub fade_time_ms: u64,
    /// Default topic for every toast
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default = "default_root_class")]
    pub root_class: String,
    #[serde(default = "default_content_class")]
    pub content_class: String,
}

fn default_display_time_ms() -> u64 {
    DEFAULT_DISPLAY_TIME_MS
}
fn default_fade_time_ms() -> u64 {
    DEFAULT_FADE_TIME_MS
}
fn default_root_class() -> String {
    DEFAULT_ROOT_CLASS.to_string()
}
fn default_content_class() -> String {
    DEFAULT_CONTENT_CLASS.to_string()
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            display_time_ms: DEFAULT_DISPLAY_TIME_MS,
            fade_time_ms: DEFAULT_FADE_TIME_MS,
            topic: None,
            root_class: default_root_class(),
            content_class: default_content_class(),
        }
    }
}

impl ToastConfig {
    /// Merge per-call options over this configuration.
    pub fn resolve(&self, options: &ToastOptions) -> EffectiveOptions {
        EffectiveOptions {
            display_time_ms: options.display_time_ms.unwrap_or(self.display_time_ms),
            fade_time_ms: options.fade_time_ms.unwrap_or(self.fade_time_ms),
            topic: options
                .topic
                .clone()
                .unwrap_or_else(|| self.topic.clone()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-call Options
// ─────────────────────────────────────────────────────────────────────────────

/// Per-call overrides. `None` fields inherit from the manager configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_time_ms: Option<u64>,
    /// `None` inherits the manager topic, `Some(None)` (`topic: null`) clears it
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_option"
    )]
    pub topic: Option<Option<String>>,
}

/// Present fields map to `Some`, so an explicit `null` survives as `Some(None)`
fn explicit_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(Some(topic.into()));
        self
    }

    /// Opt out of the manager-wide topic for this toast
    pub fn no_topic(mut self) -> Self {
        self.topic = Some(None);
        self
    }

    pub fn display_time_ms(mut self, ms: u64) -> Self {
        self.display_time_ms = Some(ms);
        self
    }

    pub fn fade_time_ms(mut self, ms: u64) -> Self {
        self.fade_time_ms = Some(ms);
        self
    }

    /// Keep the toast until it is clicked
    pub fn persistent(self) -> Self {
        self.display_time_ms(0)
    }
}

/// Options in effect for a single toast after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveOptions {
    pub display_time_ms: u64,
    pub fade_time_ms: u64,
    pub topic: Option<String>,
}

impl EffectiveOptions {
    /// Whether the toast fades and removes itself
    pub fn auto_dismiss(&self) -> bool {
        self.display_time_ms != 0
    }
}
