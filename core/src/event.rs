//! Events delivered by the host to the manager
//!
//! Timers, pointer input and structural changes all arrive through
//! [`ToastEvent`] and are applied with `NotificationManager::handle`.

use crate::entry::EntryKey;

/// Which timed transition a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Visible → Fading, after the display time
    Fade,
    /// Fading → Removed, after display + fade time
    Remove,
}

/// Payload of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerEvent {
    pub key: EntryKey,
    pub transition: Transition,
}

/// A direct child added to or removed from the observed root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<N> {
    Added(N),
    Removed(N),
}

/// Everything the host can report to the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent<N> {
    Timer(TimerEvent),
    /// `trusted` is false for synthetic, script-dispatched clicks
    Click { key: EntryKey, trusted: bool },
    PointerEnter(EntryKey),
    PointerLeave(EntryKey),
    Mutations(Vec<Mutation<N>>),
}
