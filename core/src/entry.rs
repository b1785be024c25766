//! Toast entries (runtime state)
//!
//! A `ToastEntry` is one visible or fading notification. Entries live in the
//! manager's table exactly as long as their node is attached.
//!
//! # Lifecycle
//!
//! 1. `show` → entry registered, node appended, timers armed
//! 2. display time elapses → `Fading` (opacity transition)
//! 3. fade time elapses, trusted click or eviction by topic → removed

use std::time::Duration;

use toast_types::{EffectiveOptions, Severity};

use crate::host::Host;

/// Toast id. Restarts at 0 whenever no toast is visible.
pub type ToastId = u32;

/// Identity carried by timers and listeners.
///
/// `serial` never restarts, so an event for an old toast whose id has been
/// handed out again does not match the new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub id: ToastId,
    pub serial: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
}

/// Toast body: plain text, or a node built by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastBody<N> {
    Text(String),
    Content(N),
}

impl<N> From<&str> for ToastBody<N> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<N> From<String> for ToastBody<N> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A registered toast
pub struct ToastEntry<H: Host> {
    pub(crate) key: EntryKey,
    pub(crate) severity: Severity,
    pub(crate) title: Option<String>,
    /// Message text, `None` for caller-built content
    pub(crate) text: Option<String>,
    pub(crate) topic: Option<String>,
    pub(crate) display_time: Duration,
    pub(crate) fade_time: Duration,
    pub(crate) node: H::Node,
    pub(crate) phase: ToastPhase,
    pub(crate) fade_timer: Option<H::Timer>,
    pub(crate) remove_timer: Option<H::Timer>,
}

impl<H: Host> ToastEntry<H> {
    pub(crate) fn new(
        key: EntryKey,
        severity: Severity,
        title: Option<String>,
        text: Option<String>,
        options: EffectiveOptions,
        node: H::Node,
    ) -> Self {
        Self {
            key,
            severity,
            title,
            text,
            topic: options.topic,
            display_time: Duration::from_millis(options.display_time_ms),
            fade_time: Duration::from_millis(options.fade_time_ms),
            node,
            phase: ToastPhase::Visible,
            fade_timer: None,
            remove_timer: None,
        }
    }

    pub fn id(&self) -> ToastId {
        self.key.id
    }

    pub fn key(&self) -> EntryKey {
        self.key
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn display_time(&self) -> Duration {
        self.display_time
    }

    pub fn fade_time(&self) -> Duration {
        self.fade_time
    }

    pub fn node(&self) -> &H::Node {
        &self.node
    }

    pub fn phase(&self) -> ToastPhase {
        self.phase
    }

    /// Whether the toast fades and removes itself
    pub fn auto_dismiss(&self) -> bool {
        !self.display_time.is_zero()
    }

    /// Whether a fade or remove timer is still pending
    pub fn has_pending_timers(&self) -> bool {
        self.fade_timer.is_some() || self.remove_timer.is_some()
    }

    /// Inline style applied when the fade starts
    pub(crate) fn fade_style(&self) -> String {
        format!(
            "opacity: 0; transition-duration: {}s",
            self.fade_time().as_secs_f64()
        )
    }
}

impl<H: Host> std::fmt::Debug for ToastEntry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastEntry")
            .field("key", &self.key)
            .field("severity", &self.severity)
            .field("title", &self.title)
            .field("topic", &self.topic)
            .field("phase", &self.phase)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}
