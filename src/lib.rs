//! # clusterman
//!
//! A command-line tool that manages a fixed-size group ("cluster") of
//! containers through the Docker/Podman remote API, plus a small data flow
//! that stages random numeric data in a shared volume, fans a processing
//! command out across the running containers and aggregates their results.
//!
//! ## Architecture Overview
//!
//! - **[`container`]**: bollard-backed runtime client, container lifecycle, exec and volumes
//! - **[`cluster`]**: [`ClusterManager`] operations over the labelled cluster members
//! - **[`stats`]**: range partitioning and decoding/pooling of worker statistics
//! - **[`data`]**: random dataset generation and tar packaging
//! - **[`cli`]**: argument parsing, configuration discovery and the interactive shell
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clusterman::{ClusterConfig, ClusterManager};
//! use clusterman::container::ContainerOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = ContainerOrchestrator::new().await?;
//!     let manager = ClusterManager::new(orchestrator, ClusterConfig::default());
//!
//!     manager.create("ubuntu:latest", 4).await?;
//!     for output in manager.run("uname -a").await? {
//!         println!("{}: {}", output.container, output.stdout.trim());
//!     }
//!     manager.delete().await?;
//!     Ok(())
//! }
//! ```

/// Container runtime access layer.
pub mod container;

/// Cluster operations over labelled containers.
pub mod cluster;

/// Work partitioning and result aggregation.
pub mod stats;

/// Random data generation and packaging.
pub mod data;

/// Environment constants and path utilities.
pub mod env;

// CLI module for command-line interface
pub mod cli;

pub use cluster::{ClusterConfig, ClusterError, ClusterManager, ClusterRuntime};
pub use stats::{ClusterSummary, WorkerStats};
