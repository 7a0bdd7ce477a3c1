//! Container lifecycle orchestration.
//!
//! Provides container management including image pulling, creation, startup,
//! execution, archive upload and cleanup.

use crate::container::{
    ContainerClient, ContainerConfig, ContainerError, ExecConfig, ExecOutput, Result,
};
use futures::stream::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Container orchestrator configuration.
#[derive(Debug, Clone)]
pub struct ContainerOrchestratorConfig {
    /// Container name prefix for generated names
    pub name_prefix: String,
    /// Default stop timeout in seconds
    pub stop_timeout: i64,
}

impl Default for ContainerOrchestratorConfig {
    fn default() -> Self {
        Self {
            name_prefix: "clusterman".to_string(),
            stop_timeout: 10,
        }
    }
}

/// Container orchestrator.
///
/// Each method is a single sequential call (or short call chain) into the
/// runtime API.
pub struct ContainerOrchestrator {
    client: ContainerClient,
    config: ContainerOrchestratorConfig,
}

impl ContainerOrchestrator {
    /// Create a new orchestrator with default configuration.
    ///
    /// # Errors
    ///
    /// Returns error if connection to container runtime fails.
    pub async fn new() -> Result<Self> {
        Self::with_config(ContainerOrchestratorConfig::default()).await
    }

    /// Create a new orchestrator with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if connection to container runtime fails.
    pub async fn with_config(config: ContainerOrchestratorConfig) -> Result<Self> {
        let client = ContainerClient::new().await?;
        Ok(Self { client, config })
    }

    /// Create an orchestrator with an existing client.
    pub fn with_client(client: ContainerClient, config: ContainerOrchestratorConfig) -> Self {
        Self { client, config }
    }

    /// Pull a container image if not present locally.
    ///
    /// # Errors
    ///
    /// Returns error if image pull fails.
    pub async fn ensure_image(&self, image: &str) -> Result<()> {
        if self.client.image_exists(image).await? {
            debug!("Image {} already exists locally", image);
            return Ok(());
        }

        info!("Pulling image: {}", image);
        self.pull_image(image).await
    }

    /// Pull a container image from registry.
    ///
    /// # Errors
    ///
    /// Returns error if image pull fails.
    pub async fn pull_image(&self, image: &str) -> Result<()> {
        let mut stream = self.client.docker().create_image(
            Some(bollard::image::CreateImageOptions {
                from_image: image,
                ..Default::default()
            }),
            None,
            None,
        );

        while let Some(result) = stream.next().await {
            match result {
                Ok(info) => {
                    if let Some(status) = info.status {
                        debug!("Pull status: {}", status);
                    }
                    if let Some(error) = info.error {
                        return Err(ContainerError::Other(format!("Pull failed: {}", error)));
                    }
                }
                Err(e) => {
                    return Err(ContainerError::ApiError(e));
                }
            }
        }

        info!("Successfully pulled image: {}", image);
        Ok(())
    }

    /// Create a container from configuration.
    ///
    /// When `name` is `None` a name of the form `<prefix>-<uuid>` is generated.
    /// Returns the container ID.
    ///
    /// # Errors
    ///
    /// Returns error if container creation fails.
    pub async fn create_container(
        &self,
        config: &ContainerConfig,
        name: Option<&str>,
    ) -> Result<String> {
        let container_name = name
            .map(String::from)
            .unwrap_or_else(|| format!("{}-{}", self.config.name_prefix, uuid::Uuid::new_v4()));

        let options = bollard::container::CreateContainerOptions {
            name: container_name.as_str(),
            ..Default::default()
        };

        debug!("Creating container: {}", container_name);

        use bollard::container::Config as BollardConfig;

        let bollard_config = BollardConfig {
            image: Some(config.image.clone()),
            cmd: config.cmd.clone(),
            labels: config.labels.clone(),
            tty: Some(config.tty),
            open_stdin: Some(config.open_stdin),
            host_config: Some(config.host_config.clone()),
            ..Default::default()
        };

        let response = self
            .client
            .docker()
            .create_container(Some(options), bollard_config)
            .await?;

        for warning in &response.warnings {
            warn!("Runtime warning for {}: {}", container_name, warning);
        }

        info!("Created container: {} ({})", container_name, response.id);

        Ok(response.id)
    }

    /// Start a container.
    ///
    /// # Errors
    ///
    /// Returns error if container start fails.
    pub async fn start_container(&self, container_id: &str) -> Result<()> {
        debug!("Starting container: {}", container_id);

        self.client
            .docker()
            .start_container(
                container_id,
                None::<bollard::container::StartContainerOptions<String>>,
            )
            .await
            .map_err(|e| ContainerError::for_container(container_id, e))?;

        info!("Started container: {}", container_id);
        Ok(())
    }

    /// Stop a container.
    ///
    /// # Errors
    ///
    /// Returns error if container stop fails.
    pub async fn stop_container(&self, container_id: &str) -> Result<()> {
        debug!("Stopping container: {}", container_id);

        self.client
            .docker()
            .stop_container(
                container_id,
                Some(bollard::container::StopContainerOptions {
                    t: self.config.stop_timeout,
                }),
            )
            .await
            .map_err(|e| ContainerError::for_container(container_id, e))?;

        info!("Stopped container: {}", container_id);
        Ok(())
    }

    /// Remove a container.
    ///
    /// # Errors
    ///
    /// Returns error if container removal fails.
    pub async fn remove_container(&self, container_id: &str, force: bool) -> Result<()> {
        debug!("Removing container: {}", container_id);

        self.client
            .docker()
            .remove_container(
                container_id,
                Some(bollard::container::RemoveContainerOptions {
                    force,
                    ..Default::default()
                }),
            )
            .await
            .map_err(|e| ContainerError::for_container(container_id, e))?;

        info!("Removed container: {}", container_id);
        Ok(())
    }

    /// Stop and remove a container.
    ///
    /// # Errors
    ///
    /// Returns error if removal fails.
    pub async fn stop_and_remove(&self, container_id: &str) -> Result<()> {
        // Already-stopped containers refuse the stop call
        if let Err(e) = self.stop_container(container_id).await {
            warn!("Failed to stop container {}: {}", container_id, e);
        }

        self.remove_container(container_id, true).await
    }

    /// Execute a command in a running container.
    ///
    /// # Errors
    ///
    /// Returns error if execution fails.
    pub async fn exec(&self, container_id: &str, cmd: Vec<&str>) -> Result<ExecOutput> {
        let config = ExecConfig::builder()
            .cmd(cmd)
            .attach_stdout(true)
            .attach_stderr(true)
            .build();

        self.exec_with_config(container_id, &config).await
    }

    /// Execute a command with full configuration.
    ///
    /// # Errors
    ///
    /// Returns error if execution fails.
    pub async fn exec_with_config(
        &self,
        container_id: &str,
        config: &ExecConfig,
    ) -> Result<ExecOutput> {
        use crate::container::executor;
        executor::execute(self.client.docker(), container_id, config).await
    }

    /// Extract a tar archive into `path` inside a container.
    ///
    /// # Errors
    ///
    /// Returns error if the upload fails.
    pub async fn upload_archive(
        &self,
        container_id: &str,
        path: &str,
        archive: Vec<u8>,
    ) -> Result<()> {
        debug!(
            "Uploading {} byte archive to {}:{}",
            archive.len(),
            container_id,
            path
        );

        self.client
            .docker()
            .upload_to_container(
                container_id,
                Some(bollard::query_parameters::UploadToContainerOptions {
                    path: path.to_string(),
                    ..Default::default()
                }),
                bollard::body_full(archive.into()),
            )
            .await
            .map_err(|e| ContainerError::for_container(container_id, e))?;

        info!("Uploaded archive to {}:{}", container_id, path);
        Ok(())
    }

    /// List containers, optionally including stopped ones and restricted to a label.
    ///
    /// `label` uses the runtime filter syntax: `key` or `key=value`.
    ///
    /// # Errors
    ///
    /// Returns error if listing fails.
    pub async fn list_containers(
        &self,
        all: bool,
        label: Option<&str>,
    ) -> Result<Vec<ContainerSummary>> {
        let mut filters = HashMap::new();
        if !all {
            filters.insert("status".to_string(), vec!["running".to_string()]);
        }
        if let Some(label) = label {
            filters.insert("label".to_string(), vec![label.to_string()]);
        }

        let containers = self
            .client
            .docker()
            .list_containers(Some(bollard::container::ListContainersOptions {
                all,
                filters,
                ..Default::default()
            }))
            .await?;

        Ok(containers
            .into_iter()
            .map(|c| ContainerSummary {
                id: c.id.unwrap_or_default(),
                names: c.names.unwrap_or_default(),
                image: c.image.unwrap_or_default(),
                state: c.state.map(|s| s.to_string()).unwrap_or_default(),
                status: c.status.unwrap_or_default(),
            })
            .collect())
    }

    /// Get the underlying client.
    pub fn client(&self) -> &ContainerClient {
        &self.client
    }
}

/// Container summary information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    /// Container ID
    pub id: String,
    /// Container names
    pub names: Vec<String>,
    /// Image name
    pub image: String,
    /// Container state (`running`, `exited`, ...)
    pub state: String,
    /// Human-readable status
    pub status: String,
}

impl ContainerSummary {
    /// Whether the runtime reports the container as running.
    pub fn is_running(&self) -> bool {
        self.state.eq_ignore_ascii_case("running")
    }

    /// Abbreviated container id.
    pub fn short_id(&self) -> &str {
        crate::container::short_id(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(state: &str) -> ContainerSummary {
        ContainerSummary {
            id: "0123456789abcdef0123".to_string(),
            names: vec!["/clusterman-1".to_string()],
            image: "ubuntu:latest".to_string(),
            state: state.to_string(),
            status: String::new(),
        }
    }

    #[test]
    fn test_summary_state() {
        assert!(summary("running").is_running());
        assert!(!summary("exited").is_running());
        assert!(!summary("").is_running());
        assert_eq!(summary("running").short_id(), "0123456789ab");
    }

    #[test]
    fn test_orchestrator_config_default() {
        let config = ContainerOrchestratorConfig::default();
        assert_eq!(config.name_prefix, "clusterman");
        assert_eq!(config.stop_timeout, 10);
    }

    #[tokio::test]
    #[ignore] // Requires Docker/Podman
    async fn test_container_lifecycle() {
        let orchestrator = ContainerOrchestrator::new().await.unwrap();
        orchestrator.ensure_image("alpine:latest").await.unwrap();

        let config = ContainerConfig::builder()
            .image("alpine:latest")
            .cmd(vec!["sleep", "infinity"])
            .build()
            .unwrap();

        let container_id = orchestrator.create_container(&config, None).await.unwrap();
        orchestrator.start_container(&container_id).await.unwrap();

        let output = orchestrator
            .exec(&container_id, vec!["echo", "hello"])
            .await
            .unwrap();
        assert!(output.stdout.contains("hello"));

        orchestrator.stop_and_remove(&container_id).await.unwrap();
    }
}
