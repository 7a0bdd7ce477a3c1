//! CLI-specific functionality for the cluster manager
//!
//! This module contains argument parsing, configuration discovery, the
//! interactive shell and output rendering.

pub mod args;
pub mod commands;
pub mod config;
pub mod report;
pub mod shell;

pub use args::{Args, ClusterCommand, ExecutionMode};
pub use commands::{execute, run_shell};
pub use config::{ConfigDiscovery, load_config_file, resolve_config, save_config_file};
pub use shell::{ShellInput, parse_line};
