//! Cluster operations.
//!
//! A cluster is a group of containers started from one image and tagged with
//! a shared label. Membership is whatever the runtime reports for that label;
//! nothing is stored locally.
//!
//! - [`config`]: [`ClusterConfig`], serialisable defaults for every operation
//! - [`runtime`]: the [`ClusterRuntime`] seam over the container layer
//! - [`manager`]: [`ClusterManager`] and the reports its operations return

pub mod config;
pub mod manager;
pub mod runtime;

pub use config::{ClusterConfig, DataSettings, VolumeSettings};
pub use manager::{
    ClusterManager, CommandOutput, CreateReport, GenerateReport, ProcessReport, WorkerOutcome,
    WorkerResult,
};
pub use runtime::ClusterRuntime;

use crate::container::ContainerError;

/// Cluster operation errors.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// Underlying runtime call failed
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Requested image is not available locally
    #[error("Image '{0}' not found.")]
    ImageNotFound(String),

    /// Cluster size of zero
    #[error("Cluster size must be at least 1")]
    InvalidSize,

    /// `run` called with nothing to run
    #[error("Please specify a command to run.")]
    EmptyCommand,

    /// Data-parallel operation with no running members
    #[error("No running containers in cluster '{0}'")]
    NoRunningContainers(String),

    /// Data value range with `min >= max`
    #[error("Invalid data value range: {min}..{max}")]
    InvalidValueRange { min: i64, max: i64 },

    /// IO error while staging data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cluster operations.
pub type Result<T> = std::result::Result<T, ClusterError>;
