//! Environment constants and path utilities.
//!
//! Centralizes the file and directory names used for configuration discovery.

use std::path::{Path, PathBuf};

/// Application directory name (hidden directory like .git, .vscode)
pub const APP_DIR_NAME: &str = ".clusterman";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Stand-alone configuration file name in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "clusterman.toml";

/// System-wide configuration file
#[cfg(unix)]
pub const SYSTEM_CONFIG_FILE: &str = "/etc/clusterman/config.toml";

/// Environment variable that disables runtime-backed integration tests
pub const SKIP_CONTAINER_TESTS_VAR: &str = "SKIP_CONTAINER_TESTS";

/// Build the stand-alone config file path in a directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(LOCAL_CONFIG_FILE_NAME)
}

/// Build the config file path inside a directory's `.clusterman`
pub fn local_app_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Build config directory path in user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    home_dir.join(APP_DIR_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let home_dir = Path::new("/home/user");
        let current_dir = Path::new("/current/project");

        assert_eq!(
            user_config_file_path(home_dir),
            Path::new("/home/user/.clusterman/config.toml")
        );

        assert_eq!(
            local_config_file_path(current_dir),
            Path::new("/current/project/clusterman.toml")
        );

        assert_eq!(
            local_app_config_file_path(current_dir),
            Path::new("/current/project/.clusterman/config.toml")
        );
    }
}
