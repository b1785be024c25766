//! Error types for toast operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the host document while building or moving toasts
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no document available")]
    NoDocument,

    #[error("unknown node {0}")]
    UnknownNode(usize),

    #[error("cannot insert a node into its own subtree")]
    HierarchyRequest,

    #[error("DOM operation `{op}` failed: {message}")]
    Dom { op: &'static str, message: String },
}

/// Errors while loading a toast configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse toast config TOML")]
    ParseToml(#[from] toml::de::Error),
}
