//! Interactive shell parsing.
//!
//! Lines typed at the `>>> ` prompt are split on whitespace and mapped onto
//! the same [`ClusterCommand`]s the subcommands produce.

use super::args::{ClusterCommand, parse_create_args};

/// Prompt shown before each line.
pub const PROMPT: &str = ">>> ";

/// What a shell line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Empty,
    Exit,
    Help,
    Command(ClusterCommand),
    /// Message to show the user; the loop continues
    Invalid(String),
}

/// Parse one line of shell input.
pub fn parse_line(line: &str) -> ShellInput {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((command, rest)) = words.split_first() else {
        return ShellInput::Empty;
    };

    match *command {
        "exit" | "quit" => ShellInput::Exit,
        "help" => ShellInput::Help,
        "create" => match parse_create_args(rest) {
            Ok((image, count)) => ShellInput::Command(ClusterCommand::Create { image, count }),
            Err(e) => ShellInput::Invalid(format!("Error: {}", e)),
        },
        "list" => ShellInput::Command(ClusterCommand::List),
        "run" if rest.is_empty() => {
            ShellInput::Invalid("Error: Please specify a command to run.".to_string())
        }
        "run" => ShellInput::Command(ClusterCommand::Run(rest.join(" "))),
        "stop" => ShellInput::Command(ClusterCommand::Stop),
        "delete" => ShellInput::Command(ClusterCommand::Delete),
        "volume" => ShellInput::Command(ClusterCommand::Volume),
        "generate" => match optional_number(rest, "data size") {
            Ok(size) => ShellInput::Command(ClusterCommand::Generate { size, seed: None }),
            Err(e) => ShellInput::Invalid(e),
        },
        "distribute" => ShellInput::Command(ClusterCommand::Distribute),
        "process" => match optional_number(rest, "data size") {
            Ok(size) => ShellInput::Command(ClusterCommand::Process { size, json: false }),
            Err(e) => ShellInput::Invalid(e),
        },
        _ => ShellInput::Invalid(
            "Error: Unknown command. Type 'help' for available commands.".to_string(),
        ),
    }
}

fn optional_number<T: std::str::FromStr>(rest: &[&str], what: &str) -> Result<Option<T>, String> {
    match rest {
        [] => Ok(None),
        [value] => value
            .parse()
            .map(Some)
            .map_err(|_| format!("Error: Invalid {}: {}", what, value)),
        _ => Err(format!("Error: Too many arguments; expected at most a {}", what)),
    }
}

/// Banner printed when the shell starts.
pub fn banner() -> String {
    [
        "╔══════════════════════════════╗",
        "║     Welcome to the Cluster   ║",
        "║           Manager            ║",
        "╚══════════════════════════════╝",
        "  Type 'help' to see available   ",
        "   commands or 'exit' to quit.    ",
        "────────────────────────────────",
    ]
    .join("\n")
}

/// Help text listing the shell commands.
pub fn help_text() -> String {
    [
        "Available commands:",
        "create [image_name] [num_containers]: Create a cluster with the specified number of containers (default is 8) using the specified image (default is ubuntu:latest)",
        "list: List current containers in the cluster",
        "run [command]: Run a command in all containers of the cluster",
        "stop: Stop the cluster",
        "delete: Delete the cluster",
        "volume: Create a data volume",
        "generate [data_size]: Generate random data and copy it to the data volume",
        "distribute: Distribute data to containers",
        "process [data_size]: Run data processing in containers",
        "help: Display this help message",
        "exit: Exit the program",
    ]
    .join("\n")
}
