//! Container runtime access layer.
//!
//! This module wraps the Docker/Podman remote API (via bollard) with the small
//! set of primitives the cluster manager needs: image checks, container
//! lifecycle, command execution, archive upload and volume management.
//!
//! ## Architecture
//!
//! - [`client`]: Docker/Podman API client wrapper with connection management
//! - [`orchestrator`]: Container lifecycle operations (create, start, stop, remove, list)
//! - [`config`]: Container configuration builder
//! - [`executor`]: Command execution within running containers
//! - [`volume`]: Named volume management
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clusterman::container::{ContainerConfig, ContainerOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = ContainerOrchestrator::new().await?;
//!
//!     let config = ContainerConfig::builder()
//!         .image("ubuntu:latest")
//!         .tty(true)
//!         .open_stdin(true)
//!         .build()?;
//!
//!     let container_id = orchestrator.create_container(&config, None).await?;
//!     orchestrator.start_container(&container_id).await?;
//!
//!     let output = orchestrator.exec(&container_id, vec!["echo", "Hello"]).await?;
//!     println!("{}", output.stdout);
//!
//!     orchestrator.stop_and_remove(&container_id).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod executor;
mod orchestrator;
mod volume;

pub use client::{ContainerClient, ContainerClientConfig, RuntimeType};
pub use config::{ContainerConfig, ContainerConfigBuilder};
pub use executor::{ExecConfig, ExecOutput};
pub use orchestrator::{ContainerOrchestrator, ContainerOrchestratorConfig, ContainerSummary};
pub use volume::{VolumeConfig, VolumeInfo, VolumeManager};

/// Length of the abbreviated container id shown to users.
pub const SHORT_ID_LEN: usize = 12;

/// Abbreviate a container id the way `docker ps` does.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Container runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Docker/Podman API error
    #[error("Container API error: {0}")]
    ApiError(#[from] bollard::errors::Error),

    /// Container not found
    #[error("Container not found: {0}")]
    NotFound(String),

    /// Container configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Container execution error
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// Volume error
    #[error("Volume error: {0}")]
    VolumeError(String),

    /// Runtime unreachable
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// General error
    #[error("Container error: {0}")]
    Other(String),
}

impl ContainerError {
    /// Map an API error for a call on `container_id`, turning a 404 into
    /// [`ContainerError::NotFound`].
    pub fn for_container(container_id: &str, error: bollard::errors::Error) -> Self {
        match error {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => Self::NotFound(container_id.to_string()),
            e => Self::ApiError(e),
        }
    }
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
