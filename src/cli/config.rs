//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./clusterman.toml or ./.clusterman/config.toml
//! 2. User config: ~/.clusterman/config.toml
//! 3. System config: /etc/clusterman/config.toml
//! 4. Built-in defaults

use super::args::Args;
use crate::{ClusterConfig, env};
use anyhow::{Context, Result};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Load a configuration file.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<ClusterConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Invalid configuration file {}", path.display()))
}

/// Save a configuration file.
pub fn save_config_file<P: AsRef<Path>>(config: &ClusterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let content = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write configuration file {}", path.display()))
}

/// Resolve the configuration for a run.
///
/// `--config` replaces discovery; `--cluster` then overrides the cluster name.
pub fn resolve_config(args: &Args) -> Result<ClusterConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration override from: {:?}", path);
            load_config_file(path)?
        }
        None => ConfigDiscovery::discover_config()?,
    };

    if let Some(cluster) = &args.cluster {
        debug!("Cluster name overridden: {}", cluster);
        config.name = cluster.clone();
    }

    Ok(config)
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<ClusterConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return load_config_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(ClusterConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        Self::get_config_candidates().into_iter().find(|candidate| {
            debug!("Checking for config file: {:?}", candidate);
            candidate.is_file()
        })
    }

    /// Get list of configuration file candidates in priority order
    pub fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(env::local_config_file_path(&current_dir));
            candidates.push(env::local_app_config_file_path(&current_dir));
        }

        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(PathBuf::from(env::SYSTEM_CONFIG_FILE));

        #[cfg(windows)]
        if let Ok(program_data) = std_env::var("PROGRAMDATA") {
            candidates.push(
                PathBuf::from(program_data)
                    .join("clusterman")
                    .join(env::CONFIG_FILE_NAME),
            );
        }

        candidates
    }

    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Write the built-in defaults to the user config file if none exists.
    pub fn create_default_user_config() -> Result<PathBuf> {
        let home_dir =
            Self::get_home_dir().context("Could not determine home directory")?;
        Self::create_default_config_in(&home_dir)
    }

    /// Write the built-in defaults under `home_dir` if no config exists there.
    pub fn create_default_config_in(home_dir: &Path) -> Result<PathBuf> {
        let config_dir = env::user_config_dir_path(home_dir);
        let config_path = env::user_config_file_path(home_dir);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).with_context(|| {
                format!("Failed to create directory {}", config_dir.display())
            })?;
            info!("Created configuration directory: {:?}", config_dir);
        }

        if config_path.exists() {
            warn!("Configuration file already exists: {:?}", config_path);
        } else {
            save_config_file(&ClusterConfig::default(), &config_path)?;
            info!("Created default configuration file: {:?}", config_path);
        }

        Ok(config_path)
    }

    /// Show configuration discovery information
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        for (i, candidate) in Self::get_config_candidates().iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        match Self::find_config_file() {
            Some(found) => println!("Active configuration: {:?}", found),
            None => println!("Active configuration: Built-in defaults"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("clusterman.toml");

        let mut original = ClusterConfig::default();
        original.name = "lab".to_string();
        original.data.size = 2_000;

        save_config_file(&original, &config_path).unwrap();
        assert!(config_path.exists());

        let loaded = load_config_file(&config_path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "size = \"eight\"").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration file"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config_file("/nonexistent/clusterman.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    fn args(argv: &[&str]) -> Args {
        use clap::Parser;
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_resolve_config_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("override.toml");
        fs::write(&config_path, "name = \"from-file\"\nsize = 3\n").unwrap();
        let path = config_path.to_str().unwrap();

        let config = resolve_config(&args(&["clusterman", "--config", path, "list"])).unwrap();
        assert_eq!(config.name, "from-file");
        assert_eq!(config.size, 3);
        assert_eq!(config.image, ClusterConfig::default().image);
    }

    #[test]
    fn test_resolve_config_cluster_override() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("override.toml");
        fs::write(&config_path, "name = \"from-file\"\nsize = 3\n").unwrap();
        let path = config_path.to_str().unwrap();

        let config = resolve_config(&args(&[
            "clusterman",
            "list",
            "-c",
            path,
            "--cluster",
            "analytics",
        ]))
        .unwrap();
        assert_eq!(config.name, "analytics");
        assert_eq!(config.size, 3);
        assert_eq!(config.label_filter(), "clusterman.cluster=analytics");

        // Discovery path still honours the name override
        let config = resolve_config(&args(&["clusterman", "--cluster", "other", "list"])).unwrap();
        assert_eq!(config.name, "other");
    }

    #[test]
    fn test_resolve_config_missing_override_file() {
        let err = resolve_config(&args(&[
            "clusterman",
            "--config",
            "/nonexistent/override.toml",
            "list",
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/override.toml"));
    }

    #[test]
    fn test_create_default_config_in() {
        let temp_dir = TempDir::new().unwrap();

        let path = ConfigDiscovery::create_default_config_in(temp_dir.path()).unwrap();
        assert_eq!(path, temp_dir.path().join(".clusterman").join("config.toml"));
        assert_eq!(load_config_file(&path).unwrap(), ClusterConfig::default());

        // Existing files are left alone
        fs::write(&path, "name = \"kept\"").unwrap();
        ConfigDiscovery::create_default_config_in(temp_dir.path()).unwrap();
        assert_eq!(load_config_file(&path).unwrap().name, "kept");
    }

    #[test]
    fn test_config_candidates() {
        let candidates = ConfigDiscovery::get_config_candidates();
        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].file_name().unwrap(), "clusterman.toml");
    }
}
