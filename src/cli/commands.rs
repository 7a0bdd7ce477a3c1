//! Command dispatch for the subcommands and the interactive shell.

use super::args::ClusterCommand;
use super::report;
use super::shell::{self, ShellInput};
use crate::cluster::{ClusterManager, ClusterRuntime};
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{error, info};

/// Execute one cluster command, writing user-facing output to `out`.
pub async fn execute<R, W>(
    manager: &ClusterManager<R>,
    command: &ClusterCommand,
    out: &mut W,
) -> Result<()>
where
    R: ClusterRuntime,
    W: Write,
{
    let config = manager.config();

    match command {
        ClusterCommand::Create { image, count } => {
            let image = image.as_deref().unwrap_or(&config.image);
            let count = count.unwrap_or(config.size);
            manager.create(image, count).await?;
            writeln!(
                out,
                "Cluster created with {} containers using image '{}'.",
                count, image
            )?;
        }
        ClusterCommand::List => {
            let members = manager.list().await?;
            write!(out, "{}", report::render_members(&members))?;
        }
        ClusterCommand::Run(command) => {
            let outputs = manager.run(command).await?;
            write!(out, "{}", report::render_command_outputs(command, &outputs))?;
        }
        ClusterCommand::Stop => {
            manager.stop().await?;
            writeln!(out, "Cluster stopped.")?;
        }
        ClusterCommand::Delete => {
            manager.delete().await?;
            writeln!(out, "Cluster containers deleted.")?;
        }
        ClusterCommand::Volume => {
            let name = manager.create_volume().await?;
            writeln!(out, "Data volume '{}' created.", name)?;
        }
        ClusterCommand::Generate { size, seed } => {
            let size = size.unwrap_or(config.data.size);
            let generated = manager.generate(size, *seed).await?;
            writeln!(
                out,
                "Random data generated and copied to data volume ({} values at {}).",
                generated.values, generated.path
            )?;
        }
        ClusterCommand::Distribute => {
            let outputs = manager.distribute().await?;
            let failed = outputs.iter().filter(|o| !o.success()).count();
            if failed > 0 {
                writeln!(
                    out,
                    "Data distributed to containers ({} of {} failed).",
                    failed,
                    outputs.len()
                )?;
            } else {
                writeln!(out, "Data distributed to containers.")?;
            }
        }
        ClusterCommand::Process { size, json } => {
            let size = size.unwrap_or(config.data.size as u64);
            let results = manager.process(size).await?;
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                write!(out, "{}", report::render_process_report(&results))?;
            }
        }
    }

    Ok(())
}

/// Read shell lines from `input` until `exit` or end of input.
///
/// Errors from individual commands are reported and the loop continues.
pub async fn run_shell<R, I, W>(manager: &ClusterManager<R>, input: I, out: &mut W) -> Result<()>
where
    R: ClusterRuntime,
    I: BufRead,
    W: Write,
{
    writeln!(out, "{}", shell::banner())?;

    let mut lines = input.lines();
    loop {
        write!(out, "{}", shell::PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        match shell::parse_line(&line) {
            ShellInput::Empty => continue,
            ShellInput::Exit => break,
            ShellInput::Help => writeln!(out, "{}", shell::help_text())?,
            ShellInput::Invalid(message) => writeln!(out, "{}", message)?,
            ShellInput::Command(command) => {
                info!("Shell command: {:?}", command);
                if let Err(e) = execute(manager, &command, &mut *out).await {
                    error!("Command failed: {:#}", e);
                    writeln!(out, "Error: {}", e)?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterConfig;
    use crate::container::{
        ContainerConfig, ContainerError, ContainerSummary, ExecConfig, ExecOutput,
        Result as ContainerResult, VolumeConfig,
    };
    use async_trait::async_trait;

    /// Runtime with no images and no containers; mutating calls fail.
    struct EmptyRuntime;

    fn unreachable_runtime<T>() -> ContainerResult<T> {
        Err(ContainerError::Other("runtime call not expected".to_string()))
    }

    #[async_trait]
    impl ClusterRuntime for EmptyRuntime {
        async fn image_exists(&self, _image: &str) -> ContainerResult<bool> {
            Ok(false)
        }
        async fn pull_image(&self, _image: &str) -> ContainerResult<()> {
            unreachable_runtime()
        }
        async fn create_container(&self, _config: &ContainerConfig) -> ContainerResult<String> {
            unreachable_runtime()
        }
        async fn start_container(&self, _id: &str) -> ContainerResult<()> {
            unreachable_runtime()
        }
        async fn stop_container(&self, _id: &str) -> ContainerResult<()> {
            unreachable_runtime()
        }
        async fn remove_container(&self, _id: &str, _force: bool) -> ContainerResult<()> {
            unreachable_runtime()
        }
        async fn list_containers(
            &self,
            _all: bool,
            _label: &str,
        ) -> ContainerResult<Vec<ContainerSummary>> {
            Ok(Vec::new())
        }
        async fn exec(&self, _id: &str, _config: &ExecConfig) -> ContainerResult<ExecOutput> {
            unreachable_runtime()
        }
        async fn create_volume(&self, config: &VolumeConfig) -> ContainerResult<String> {
            Ok(config.name.clone())
        }
        async fn upload_archive(
            &self,
            _id: &str,
            _path: &str,
            _archive: Vec<u8>,
        ) -> ContainerResult<()> {
            unreachable_runtime()
        }
    }

    async fn shell_transcript(input: &str) -> String {
        let manager = ClusterManager::new(EmptyRuntime, ClusterConfig::default());
        let mut out = Vec::new();
        run_shell(&manager, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_execute_simple_commands() {
        let manager = ClusterManager::new(EmptyRuntime, ClusterConfig::default());
        let mut out = Vec::new();

        execute(&manager, &ClusterCommand::Stop, &mut out).await.unwrap();
        execute(&manager, &ClusterCommand::Volume, &mut out).await.unwrap();
        execute(&manager, &ClusterCommand::List, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Cluster stopped.\nData volume 'data_volume' created.\nCurrent containers in the cluster:\n"
        );
    }

    #[tokio::test]
    async fn test_execute_create_uses_config_defaults() {
        let manager = ClusterManager::new(EmptyRuntime, ClusterConfig::default());
        let mut out = Vec::new();

        let err = execute(
            &manager,
            &ClusterCommand::Create {
                image: None,
                count: None,
            },
            &mut out,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Image 'ubuntu:latest' not found.");
    }

    #[tokio::test]
    async fn test_shell_session() {
        let transcript = shell_transcript("\nhelp\nlaunch\nrun\nprocess\nexit\nlist\n").await;

        assert!(transcript.contains("Welcome to the Cluster"));
        assert!(transcript.contains("Available commands:"));
        assert!(transcript.contains("Error: Unknown command. Type 'help' for available commands."));
        assert!(transcript.contains("Error: Please specify a command to run."));
        assert!(transcript.contains("Error: No running containers in cluster 'default'"));
        // Nothing after exit runs
        assert!(!transcript.contains("Current containers in the cluster:"));
    }

    #[tokio::test]
    async fn test_shell_ends_at_eof() {
        let transcript = shell_transcript("list\n").await;
        assert!(transcript.contains("Current containers in the cluster:"));
        assert!(transcript.ends_with(">>> \n"));
    }
}
