//! Container configuration builders.
//!
//! Provides a fluent API for building container configurations programmatically.

use crate::container::{ContainerError, Result};
use bollard::service::HostConfig;
use std::collections::HashMap;

/// Container configuration builder.
pub struct ContainerConfigBuilder {
    image: Option<String>,
    cmd: Option<Vec<String>>,
    labels: HashMap<String, String>,
    binds: Vec<String>,
    tty: bool,
    open_stdin: bool,
    auto_remove: bool,
}

impl Default for ContainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerConfigBuilder {
    /// Create a new container configuration builder.
    pub fn new() -> Self {
        Self {
            image: None,
            cmd: None,
            labels: HashMap::new(),
            binds: Vec::new(),
            tty: false,
            open_stdin: false,
            auto_remove: false,
        }
    }

    /// Set the container image.
    pub fn image<S: Into<String>>(mut self, image: S) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the command to run in the container.
    pub fn cmd<I, S>(mut self, cmd: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cmd = Some(cmd.into_iter().map(|s| s.into()).collect());
        self
    }

    /// Add a label to the container.
    pub fn label<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add a volume bind (`source:container_path[:mode]`).
    ///
    /// The source may be a host path or a named volume.
    pub fn bind<S: Into<String>>(mut self, bind: S) -> Self {
        self.binds.push(bind.into());
        self
    }

    /// Allocate a pseudo-TTY.
    pub fn tty(mut self, enable: bool) -> Self {
        self.tty = enable;
        self
    }

    /// Keep stdin open even when nothing is attached.
    pub fn open_stdin(mut self, enable: bool) -> Self {
        self.open_stdin = enable;
        self
    }

    /// Enable auto-removal of container on exit.
    pub fn auto_remove(mut self, enable: bool) -> Self {
        self.auto_remove = enable;
        self
    }

    /// Build the container configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the image is missing or empty.
    pub fn build(self) -> Result<ContainerConfig> {
        let image = self
            .image
            .filter(|image| !image.trim().is_empty())
            .ok_or_else(|| ContainerError::ConfigError("Image is required".to_string()))?;

        let host_config = HostConfig {
            binds: if self.binds.is_empty() {
                None
            } else {
                Some(self.binds)
            },
            auto_remove: Some(self.auto_remove),
            ..Default::default()
        };

        Ok(ContainerConfig {
            image,
            cmd: self.cmd,
            labels: if self.labels.is_empty() {
                None
            } else {
                Some(self.labels)
            },
            tty: self.tty,
            open_stdin: self.open_stdin,
            host_config,
        })
    }
}

/// Container configuration.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Image name
    pub image: String,
    /// Command to run
    pub cmd: Option<Vec<String>>,
    /// Labels
    pub labels: Option<HashMap<String, String>>,
    /// Allocate a pseudo-TTY
    pub tty: bool,
    /// Keep stdin open
    pub open_stdin: bool,
    /// Host configuration
    pub host_config: HostConfig,
}

impl ContainerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ContainerConfigBuilder {
        ContainerConfigBuilder::new()
    }

    /// Get the image name.
    pub fn image(&self) -> &str {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_config() {
        let config = ContainerConfig::builder()
            .image("ubuntu:latest")
            .cmd(vec!["sleep", "infinity"])
            .tty(true)
            .open_stdin(true)
            .build()
            .unwrap();

        assert_eq!(config.image(), "ubuntu:latest");
        assert_eq!(
            config.cmd,
            Some(vec!["sleep".to_string(), "infinity".to_string()])
        );
        assert!(config.tty);
        assert!(config.open_stdin);
        assert_eq!(config.host_config.auto_remove, Some(false));
    }

    #[test]
    fn test_labels_and_binds() {
        let config = ContainerConfig::builder()
            .image("ubuntu:latest")
            .label("clusterman.cluster", "default")
            .bind("data_volume:/data:rw")
            .build()
            .unwrap();

        let labels = config.labels.unwrap();
        assert_eq!(labels.get("clusterman.cluster").unwrap(), "default");

        let binds = config.host_config.binds.unwrap();
        assert_eq!(binds, vec!["data_volume:/data:rw".to_string()]);
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let config = ContainerConfig::builder().image("alpine").build().unwrap();
        assert!(config.labels.is_none());
        assert!(config.host_config.binds.is_none());
        assert!(config.cmd.is_none());
    }

    #[test]
    fn test_missing_image_error() {
        let result = ContainerConfig::builder().cmd(vec!["echo"]).build();
        assert!(matches!(result, Err(ContainerError::ConfigError(_))));

        let result = ContainerConfig::builder().image("  ").build();
        assert!(matches!(result, Err(ContainerError::ConfigError(_))));
    }
}
