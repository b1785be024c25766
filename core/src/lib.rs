//! Toast notification manager
//!
//! Creates, times and dismisses transient notifications layered above a host
//! document. The manager itself is host-agnostic; see [`host`] for the traits
//! a document backend implements and [`host::HeadlessHost`] for the
//! in-memory one.

pub mod config;
pub mod entry;
pub mod error;
pub mod event;
pub mod host;
mod manager;

#[cfg(test)]
mod manager_tests;

// Re-exports for convenience
pub use config::{EffectiveOptions, Severity, ToastConfig, ToastOptions};
pub use entry::{EntryKey, ToastBody, ToastEntry, ToastId, ToastPhase};
pub use error::{ConfigError, HostError};
pub use event::{Mutation, TimerEvent, ToastEvent, Transition};
pub use host::{Document, HeadlessHost, Host, Interaction, NodeId, Scheduler, StructureWatch};
pub use manager::NotificationManager;
