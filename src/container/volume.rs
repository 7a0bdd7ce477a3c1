//! Container volume management.
//!
//! Creates and inspects the named volumes shared between cluster containers.

use crate::container::{ContainerError, Result};
use bollard::Docker;
use std::collections::HashMap;
use tracing::{debug, info};

/// Volume configuration.
#[derive(Debug, Clone)]
pub struct VolumeConfig {
    /// Volume name
    pub name: String,
    /// Volume driver
    pub driver: String,
    /// Volume labels
    pub labels: HashMap<String, String>,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            driver: "local".to_string(),
            labels: HashMap::new(),
        }
    }
}

/// Volume manager for persistent storage.
pub struct VolumeManager {
    docker: Docker,
}

impl VolumeManager {
    /// Create a new volume manager.
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Create a new volume.
    ///
    /// Creating a volume that already exists returns the existing one.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or volume creation fails.
    pub async fn create_volume(&self, config: &VolumeConfig) -> Result<String> {
        if config.name.trim().is_empty() {
            return Err(ContainerError::VolumeError(
                "Volume name is required".to_string(),
            ));
        }

        debug!("Creating volume: {}", config.name);

        let labels: HashMap<&str, &str> = config
            .labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let response = self
            .docker
            .create_volume(bollard::volume::CreateVolumeOptions {
                name: config.name.as_str(),
                driver: config.driver.as_str(),
                driver_opts: HashMap::new(),
                labels,
            })
            .await?;

        info!("Created volume: {}", response.name);

        Ok(response.name)
    }

    /// Remove a volume.
    ///
    /// # Errors
    ///
    /// Returns error if volume removal fails.
    pub async fn remove_volume(&self, volume_name: &str, force: bool) -> Result<()> {
        debug!("Removing volume: {}", volume_name);

        self.docker
            .remove_volume(
                volume_name,
                Some(bollard::volume::RemoveVolumeOptions { force }),
            )
            .await?;

        info!("Removed volume: {}", volume_name);
        Ok(())
    }

    /// Inspect a volume, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if volume inspection fails for reasons other than not found.
    pub async fn inspect_volume(&self, volume_name: &str) -> Result<Option<VolumeInfo>> {
        match self.docker.inspect_volume(volume_name).await {
            Ok(v) => Ok(Some(VolumeInfo {
                name: v.name,
                driver: v.driver,
                mountpoint: v.mountpoint,
            })),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(None),
            Err(e) => Err(ContainerError::ApiError(e)),
        }
    }

    /// List volumes, optionally restricted to a label (`key` or `key=value`).
    ///
    /// # Errors
    ///
    /// Returns error if listing fails.
    pub async fn list_volumes(&self, label: Option<&str>) -> Result<Vec<VolumeInfo>> {
        let mut filters = HashMap::new();
        if let Some(label) = label {
            filters.insert("label".to_string(), vec![label.to_string()]);
        }

        let response = self
            .docker
            .list_volumes(Some(bollard::volume::ListVolumesOptions { filters }))
            .await?;

        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| VolumeInfo {
                name: v.name,
                driver: v.driver,
                mountpoint: v.mountpoint,
            })
            .collect())
    }

    /// Check if a volume exists.
    ///
    /// # Errors
    ///
    /// Returns error if volume inspection fails.
    pub async fn volume_exists(&self, volume_name: &str) -> Result<bool> {
        Ok(self.inspect_volume(volume_name).await?.is_some())
    }
}

/// Volume information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Volume name
    pub name: String,
    /// Volume driver
    pub driver: String,
    /// Mount point on host
    pub mountpoint: String,
}
