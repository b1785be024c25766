//! Host abstraction
//!
//! The manager never touches a concrete document. It talks to four narrow
//! traits instead:
//! - **Document**: node creation, attachment, classes, text and style
//! - **Scheduler**: one-shot cancellable timers
//! - **StructureWatch**: child additions/removals under the document root
//! - **Interaction**: click and pointer listeners on toast nodes
//!
//! ```text
//!   success/info/...        ToastEvent (timers, clicks, mutations)
//!          │                          ▲
//!          ▼                          │
//!   NotificationManager ──calls──► Host (HeadlessHost | WebHost)
//! ```

mod headless;

pub use headless::{Binding, HeadlessHost, NodeId};

use std::fmt::Debug;
use std::time::Duration;

use crate::entry::EntryKey;
use crate::error::HostError;
use crate::event::TimerEvent;

/// The presentation tree toasts are rendered into
pub trait Document {
    type Node: Clone + PartialEq + Debug;

    /// Document root (the body). Dialogs are its direct children.
    fn root(&self) -> Result<Self::Node, HostError>;

    /// Topmost open modal dialog, if any
    fn active_dialog(&self) -> Result<Option<Self::Node>, HostError>;

    fn is_dialog(&self, node: &Self::Node) -> bool;

    /// Whether a dialog node carries the `open` attribute
    fn is_open(&self, node: &Self::Node) -> bool;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, HostError>;

    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), HostError>;

    fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), HostError>;

    /// Replace the inline style. An empty string clears it.
    fn set_style(&mut self, node: &Self::Node, css: &str) -> Result<(), HostError>;

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Append caller-supplied content. Template nodes contribute their
    /// children instead of themselves.
    fn append_content(&mut self, parent: &Self::Node, content: &Self::Node)
    -> Result<(), HostError>;

    /// Detach a node from its parent. Detached nodes are ignored.
    fn detach(&mut self, node: &Self::Node);
}

/// One-shot timers that deliver a [`TimerEvent`] back to the manager
pub trait Scheduler {
    type Timer;

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> Self::Timer;

    fn cancel(&mut self, timer: Self::Timer);
}

/// Subscription to structural changes of the document root
pub trait StructureWatch: Document {
    fn observe(&mut self, root: &Self::Node) -> Result<(), HostError>;

    fn disconnect(&mut self);
}

/// Listeners turning user input on a toast into `ToastEvent`s
pub trait Interaction: Document {
    /// Listen for clicks on `node`, plus pointer enter/leave when `hover` is set
    fn bind(&mut self, node: &Self::Node, key: EntryKey, hover: bool) -> Result<(), HostError>;

    fn unbind(&mut self, node: &Self::Node, key: EntryKey);
}

/// Everything the manager needs from its environment
pub trait Host: Document + Scheduler + StructureWatch + Interaction {}

impl<T> Host for T where T: Document + Scheduler + StructureWatch + Interaction {}
