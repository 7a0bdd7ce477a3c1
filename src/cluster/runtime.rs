//! Runtime seam for cluster operations.
//!
//! [`ClusterManager`](super::ClusterManager) talks to the runtime only through
//! [`ClusterRuntime`], which [`ContainerOrchestrator`] implements against the
//! real Docker/Podman API.

use crate::container::{
    ContainerConfig, ContainerOrchestrator, ContainerSummary, ExecConfig, ExecOutput, Result,
    VolumeConfig, VolumeManager,
};
use async_trait::async_trait;

/// Container runtime primitives used by the cluster manager.
#[async_trait]
pub trait ClusterRuntime: Send + Sync {
    /// Whether `image` is present locally.
    async fn image_exists(&self, image: &str) -> Result<bool>;

    /// Pull `image` from its registry.
    async fn pull_image(&self, image: &str) -> Result<()>;

    /// Create a container and return its id.
    async fn create_container(&self, config: &ContainerConfig) -> Result<String>;

    async fn start_container(&self, id: &str) -> Result<()>;

    async fn stop_container(&self, id: &str) -> Result<()>;

    async fn remove_container(&self, id: &str, force: bool) -> Result<()>;

    /// List containers carrying `label` (`key=value`), stopped ones included when `all`.
    async fn list_containers(&self, all: bool, label: &str) -> Result<Vec<ContainerSummary>>;

    async fn exec(&self, id: &str, config: &ExecConfig) -> Result<ExecOutput>;

    /// Create a named volume and return its name.
    async fn create_volume(&self, config: &VolumeConfig) -> Result<String>;

    /// Extract a tar archive at `path` inside the container.
    async fn upload_archive(&self, id: &str, path: &str, archive: Vec<u8>) -> Result<()>;
}

#[async_trait]
impl ClusterRuntime for ContainerOrchestrator {
    async fn image_exists(&self, image: &str) -> Result<bool> {
        self.client().image_exists(image).await
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        ContainerOrchestrator::pull_image(self, image).await
    }

    async fn create_container(&self, config: &ContainerConfig) -> Result<String> {
        ContainerOrchestrator::create_container(self, config, None).await
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        ContainerOrchestrator::start_container(self, id).await
    }

    async fn stop_container(&self, id: &str) -> Result<()> {
        ContainerOrchestrator::stop_container(self, id).await
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<()> {
        ContainerOrchestrator::remove_container(self, id, force).await
    }

    async fn list_containers(&self, all: bool, label: &str) -> Result<Vec<ContainerSummary>> {
        ContainerOrchestrator::list_containers(self, all, Some(label)).await
    }

    async fn exec(&self, id: &str, config: &ExecConfig) -> Result<ExecOutput> {
        self.exec_with_config(id, config).await
    }

    async fn create_volume(&self, config: &VolumeConfig) -> Result<String> {
        VolumeManager::new(self.client().docker().clone())
            .create_volume(config)
            .await
    }

    async fn upload_archive(&self, id: &str, path: &str, archive: Vec<u8>) -> Result<()> {
        ContainerOrchestrator::upload_archive(self, id, path, archive).await
    }
}
