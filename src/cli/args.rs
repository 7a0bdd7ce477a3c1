//! Command line argument parsing
//!
//! Subcommands map one-to-one onto cluster operations, plus:
//! - `shell`: interactive prompt accepting the same operations
//! - `show-config`: show configuration discovery information
//! - `init-config`: write the default configuration to the user config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A cluster operation, as requested on the command line or in the shell.
///
/// `None` fields fall back to the active configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCommand {
    Create {
        image: Option<String>,
        count: Option<usize>,
    },
    List,
    Run(String),
    Stop,
    Delete,
    Volume,
    Generate {
        size: Option<usize>,
        seed: Option<u64>,
    },
    Distribute,
    Process {
        size: Option<u64>,
        json: bool,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum ExecutionMode {
    Cluster(ClusterCommand),
    Shell,
    ShowConfig,
    InitConfig,
}

#[derive(Debug, Parser)]
#[command(name = "clusterman")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Create, command and tear down a cluster of containers")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path (skips discovery)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    /// Cluster name (overrides the configuration)
    #[arg(long = "cluster", global = true)]
    pub cluster: Option<String>,
    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a cluster: `create [IMAGE] [COUNT]` (a lone number is the count)
    Create {
        #[arg(value_name = "IMAGE|COUNT", num_args = 0..=2)]
        args: Vec<String>,
    },
    /// List current containers in the cluster
    List,
    /// Run a command in all containers of the cluster
    Run {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Stop the cluster
    Stop,
    /// Delete the cluster
    Delete,
    /// Create the shared data volume
    Volume,
    /// Generate random data and copy it to the data volume
    Generate {
        /// Number of values to generate
        size: Option<usize>,
        /// Seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Copy the data file from the volume into each running container
    Distribute,
    /// Run data processing in containers and aggregate the results
    Process {
        /// Size of the data range to split across containers
        size: Option<u64>,
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the interactive shell
    Shell,
    /// Show configuration discovery information
    ShowConfig,
    /// Write the default configuration to ~/.clusterman/config.toml
    InitConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        let command = match &self.command {
            Some(Commands::Create { args }) => {
                let (image, count) = parse_create_args(args)?;
                ClusterCommand::Create { image, count }
            }
            Some(Commands::List) => ClusterCommand::List,
            Some(Commands::Run { command }) => ClusterCommand::Run(command.join(" ")),
            Some(Commands::Stop) => ClusterCommand::Stop,
            Some(Commands::Delete) => ClusterCommand::Delete,
            Some(Commands::Volume) => ClusterCommand::Volume,
            Some(Commands::Generate { size, seed }) => ClusterCommand::Generate {
                size: *size,
                seed: *seed,
            },
            Some(Commands::Distribute) => ClusterCommand::Distribute,
            Some(Commands::Process { size, json }) => ClusterCommand::Process {
                size: *size,
                json: *json,
            },
            Some(Commands::Shell) => return Ok(ExecutionMode::Shell),
            Some(Commands::ShowConfig) => return Ok(ExecutionMode::ShowConfig),
            Some(Commands::InitConfig) => return Ok(ExecutionMode::InitConfig),
            None => {
                return Err(
                    "No command specified. Use 'clusterman --help' to see available commands."
                        .to_string(),
                );
            }
        };

        Ok(ExecutionMode::Cluster(command))
    }
}

/// Resolve `create` arguments.
///
/// - no arguments: defaults for both
/// - one all-digit argument: the count
/// - one other argument: the image
/// - two arguments: image then count
pub fn parse_create_args<S: AsRef<str>>(args: &[S]) -> Result<(Option<String>, Option<usize>), String> {
    let parse_count = |value: &str| {
        value
            .parse::<usize>()
            .map_err(|_| format!("Invalid container count: {}", value))
    };

    match args {
        [] => Ok((None, None)),
        [single] => {
            let single = single.as_ref();
            if !single.is_empty() && single.chars().all(|c| c.is_ascii_digit()) {
                Ok((None, Some(parse_count(single)?)))
            } else {
                Ok((Some(single.to_string()), None))
            }
        }
        [image, count] => Ok((Some(image.as_ref().to_string()), Some(parse_count(count.as_ref())?))),
        _ => Err("Usage: create [image_name] [num_containers]".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_of(argv: &[&str]) -> ExecutionMode {
        Args::try_parse_from(argv).unwrap().mode().unwrap()
    }

    #[test]
    fn test_create_args() {
        assert_eq!(parse_create_args::<&str>(&[]).unwrap(), (None, None));
        assert_eq!(parse_create_args(&["4"]).unwrap(), (None, Some(4)));
        assert_eq!(
            parse_create_args(&["alpine:3.20"]).unwrap(),
            (Some("alpine:3.20".to_string()), None)
        );
        assert_eq!(
            parse_create_args(&["alpine", "3"]).unwrap(),
            (Some("alpine".to_string()), Some(3))
        );
        assert!(parse_create_args(&["alpine", "three"]).is_err());
        assert!(parse_create_args(&["a", "1", "2"]).is_err());
    }

    #[test]
    fn test_create_command() {
        assert_eq!(
            mode_of(&["clusterman", "create", "5"]),
            ExecutionMode::Cluster(ClusterCommand::Create {
                image: None,
                count: Some(5)
            })
        );
        assert_eq!(
            mode_of(&["clusterman", "create", "ubuntu:22.04", "2"]),
            ExecutionMode::Cluster(ClusterCommand::Create {
                image: Some("ubuntu:22.04".to_string()),
                count: Some(2)
            })
        );
    }

    #[test]
    fn test_run_command_joins_words() {
        assert_eq!(
            mode_of(&["clusterman", "run", "ls", "-la", "/data"]),
            ExecutionMode::Cluster(ClusterCommand::Run("ls -la /data".to_string()))
        );
    }

    #[test]
    fn test_run_requires_command() {
        assert!(Args::try_parse_from(["clusterman", "run"]).is_err());
    }

    #[test]
    fn test_generate_and_process() {
        assert_eq!(
            mode_of(&["clusterman", "generate", "1000", "--seed", "9"]),
            ExecutionMode::Cluster(ClusterCommand::Generate {
                size: Some(1000),
                seed: Some(9)
            })
        );
        assert_eq!(
            mode_of(&["clusterman", "process", "--json"]),
            ExecutionMode::Cluster(ClusterCommand::Process {
                size: None,
                json: true
            })
        );
    }

    #[test]
    fn test_global_options() {
        let args =
            Args::try_parse_from(["clusterman", "list", "--cluster", "lab", "-v"]).unwrap();
        assert_eq!(args.cluster.as_deref(), Some("lab"));
        assert!(args.verbose);
        assert_eq!(
            args.mode().unwrap(),
            ExecutionMode::Cluster(ClusterCommand::List)
        );
    }

    #[test]
    fn test_other_modes() {
        assert_eq!(mode_of(&["clusterman", "shell"]), ExecutionMode::Shell);
        assert_eq!(
            mode_of(&["clusterman", "show-config"]),
            ExecutionMode::ShowConfig
        );
        assert_eq!(
            mode_of(&["clusterman", "init-config"]),
            ExecutionMode::InitConfig
        );
    }

    #[test]
    fn test_no_command_error() {
        let args = Args {
            config: None,
            cluster: None,
            verbose: false,
            command: None,
        };
        assert!(args.mode().is_err());
    }
}
