//! Cluster configuration.

use serde::{Deserialize, Serialize};

/// Default image for cluster members.
pub const DEFAULT_IMAGE: &str = "ubuntu:latest";

/// Default number of cluster members.
pub const DEFAULT_CLUSTER_SIZE: usize = 8;

/// Default number of generated data items.
pub const DEFAULT_DATA_SIZE: usize = 100_000;

/// Settings for every cluster operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Cluster name, used as the membership label value
    pub name: String,
    /// Label key that marks cluster members
    pub label_key: String,
    /// Image used by `create` when none is given, and by the data helper
    pub image: String,
    /// Number of containers `create` starts when no count is given
    pub size: usize,
    /// Pull missing images instead of failing
    pub auto_pull: bool,
    /// Seconds the runtime waits before killing a stopping container
    pub stop_timeout: i64,
    pub volume: VolumeSettings,
    pub data: DataSettings,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            label_key: "clusterman.cluster".to_string(),
            image: DEFAULT_IMAGE.to_string(),
            size: DEFAULT_CLUSTER_SIZE,
            auto_pull: false,
            stop_timeout: 10,
            volume: VolumeSettings::default(),
            data: DataSettings::default(),
        }
    }
}

impl ClusterConfig {
    /// Runtime label filter selecting this cluster's members.
    pub fn label_filter(&self) -> String {
        format!("{}={}", self.label_key, self.name)
    }
}

/// Shared data volume settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSettings {
    pub name: String,
    pub driver: String,
    /// Mount path inside every container
    pub mount_path: String,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            name: "data_volume".to_string(),
            driver: "local".to_string(),
            mount_path: "/data".to_string(),
        }
    }
}

impl VolumeSettings {
    /// Bind specification mounting the volume read-write.
    pub fn bind(&self) -> String {
        format!("{}:{}:rw", self.name, self.mount_path)
    }
}

/// Data generation and processing settings.
///
/// The command templates accept `{id}` (short container id), `{mount}`,
/// `{file}`, `{start}` and `{end}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// File name of the dataset inside the volume
    pub file_name: String,
    /// Number of generated values, and the range size `process` partitions
    pub size: usize,
    /// Inclusive lower bound of generated values
    pub value_min: i64,
    /// Exclusive upper bound of generated values
    pub value_max: i64,
    /// Command that copies the dataset into each container
    pub distribute_command: String,
    /// Command that processes `[start, end)` and prints five statistics
    pub worker_command: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            file_name: "data.txt".to_string(),
            size: DEFAULT_DATA_SIZE,
            value_min: 0,
            value_max: 100,
            distribute_command: "mkdir -p /app && cp {mount}/{file} /app/data{id}.txt"
                .to_string(),
            worker_command: "python process_data.py {start} {end}".to_string(),
        }
    }
}

/// Substitute `{key}` placeholders in a command template.
///
/// Unknown placeholders are left untouched.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClusterConfig::default();
        assert_eq!(config.image, "ubuntu:latest");
        assert_eq!(config.size, 8);
        assert_eq!(config.data.size, 100_000);
        assert_eq!(config.label_filter(), "clusterman.cluster=default");
        assert_eq!(config.volume.bind(), "data_volume:/data:rw");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClusterConfig = toml::from_str(
            r#"
            name = "lab"
            size = 3

            [data]
            worker_command = "python3 /app/worker.py {start} {end}"
            "#,
        )
        .unwrap();

        assert_eq!(config.name, "lab");
        assert_eq!(config.size, 3);
        assert_eq!(config.image, DEFAULT_IMAGE);
        assert_eq!(config.volume, VolumeSettings::default());
        assert_eq!(config.data.file_name, "data.txt");
        assert_eq!(
            config.data.worker_command,
            "python3 /app/worker.py {start} {end}"
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClusterConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ClusterConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_render_template() {
        let rendered = render_template(
            "mkdir -p /app && cp {mount}/{file} /app/data{id}.txt",
            &[("id", "abc123"), ("mount", "/data"), ("file", "data.txt")],
        );
        assert_eq!(rendered, "mkdir -p /app && cp /data/data.txt /app/dataabc123.txt");

        assert_eq!(render_template("echo {other}", &[("id", "x")]), "echo {other}");
    }
}
