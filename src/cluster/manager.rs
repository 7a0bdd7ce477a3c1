//! Cluster manager.
//!
//! Every operation is a straight sequence of runtime calls over the members
//! the runtime currently reports for the cluster label.

use super::config::render_template;
use super::{ClusterConfig, ClusterError, ClusterRuntime, Result};
use crate::container::{ContainerConfig, ContainerSummary, ExecConfig, ExecOutput, VolumeConfig};
use crate::data;
use crate::stats::{self, ClusterSummary, WorkerStats};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Outcome of [`ClusterManager::create`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateReport {
    pub image: String,
    /// Ids of the containers that were created and started
    pub containers: Vec<String>,
}

/// Output of a command run in one container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutput {
    /// Short container id
    pub container: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i64>,
}

impl CommandOutput {
    fn new(container: &ContainerSummary, output: ExecOutput) -> Self {
        Self {
            container: container.short_id().to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.exit_code,
        }
    }

    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Outcome of [`ClusterManager::generate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateReport {
    pub volume: String,
    /// Path of the dataset inside a container
    pub path: String,
    pub values: usize,
    pub bytes: usize,
}

/// What one worker produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkerOutcome {
    Completed(WorkerStats),
    Failed { error: String, output: String },
}

/// One worker's slice of a [`ProcessReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerResult {
    /// Short container id
    pub container: String,
    pub start: u64,
    pub end: u64,
    pub outcome: WorkerOutcome,
}

impl WorkerResult {
    /// Number of items the worker was assigned.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Outcome of [`ClusterManager::process`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub size: u64,
    pub workers: Vec<WorkerResult>,
    /// Pooled statistics of the completed workers
    pub summary: Option<ClusterSummary>,
}

impl ProcessReport {
    /// Workers whose output could not be used.
    pub fn failures(&self) -> impl Iterator<Item = &WorkerResult> {
        self.workers
            .iter()
            .filter(|w| matches!(w.outcome, WorkerOutcome::Failed { .. }))
    }
}

/// Manages one labelled group of containers.
pub struct ClusterManager<R> {
    runtime: R,
    config: ClusterConfig,
}

impl<R: ClusterRuntime> ClusterManager<R> {
    /// Create a manager over `runtime`.
    pub fn new(runtime: R, config: ClusterConfig) -> Self {
        Self { runtime, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// The runtime this manager drives.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Make sure `image` is available, pulling it when `auto_pull` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::ImageNotFound`] if the image is missing and
    /// pulling is disabled.
    pub async fn ensure_image(&self, image: &str) -> Result<()> {
        if self.runtime.image_exists(image).await? {
            return Ok(());
        }

        if !self.config.auto_pull {
            return Err(ClusterError::ImageNotFound(image.to_string()));
        }

        info!("Image {} not found locally, pulling", image);
        self.runtime.pull_image(image).await?;
        Ok(())
    }

    /// Create and start `count` detached members from `image`.
    ///
    /// Members get a TTY and open stdin so images whose default command is a
    /// shell keep running, and the data volume is mounted in each.
    ///
    /// # Errors
    ///
    /// Fails before creating anything if `count` is zero or the image is
    /// unavailable; fails on the first runtime error otherwise.
    pub async fn create(&self, image: &str, count: usize) -> Result<CreateReport> {
        if count == 0 {
            return Err(ClusterError::InvalidSize);
        }
        self.ensure_image(image).await?;

        let member = ContainerConfig::builder()
            .image(image)
            .label(&self.config.label_key, &self.config.name)
            .bind(self.config.volume.bind())
            .tty(true)
            .open_stdin(true)
            .build()?;

        let mut containers = Vec::with_capacity(count);
        for idx in 0..count {
            let id = self.runtime.create_container(&member).await?;
            self.runtime.start_container(&id).await?;
            debug!("Cluster member {}/{} started: {}", idx + 1, count, id);
            containers.push(id);
        }

        info!(
            "Cluster '{}' created with {} containers using image '{}'",
            self.config.name, count, image
        );

        Ok(CreateReport {
            image: image.to_string(),
            containers,
        })
    }

    /// All members, running or not.
    ///
    /// # Errors
    ///
    /// Returns error if the runtime listing fails.
    pub async fn list(&self) -> Result<Vec<ContainerSummary>> {
        Ok(self
            .runtime
            .list_containers(true, &self.config.label_filter())
            .await?)
    }

    /// Running members only.
    ///
    /// # Errors
    ///
    /// Returns error if the runtime listing fails.
    pub async fn running(&self) -> Result<Vec<ContainerSummary>> {
        Ok(self
            .runtime
            .list_containers(false, &self.config.label_filter())
            .await?)
    }

    /// Run a shell command in every member, starting stopped members first.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::EmptyCommand`] for a blank command, or the first
    /// runtime error.
    pub async fn run(&self, command: &str) -> Result<Vec<CommandOutput>> {
        let command = command.trim();
        if command.is_empty() {
            return Err(ClusterError::EmptyCommand);
        }

        let exec = ExecConfig::builder().shell(command).build();
        let mut outputs = Vec::new();

        for container in self.list().await? {
            if !container.is_running() {
                debug!("Starting stopped member {}", container.id);
                self.runtime.start_container(&container.id).await?;
            }
            let output = self.runtime.exec(&container.id, &exec).await?;
            outputs.push(CommandOutput::new(&container, output));
        }

        info!("Command '{}' executed in {} containers", command, outputs.len());
        Ok(outputs)
    }

    /// Stop every running member. Returns the short ids that were stopped.
    ///
    /// # Errors
    ///
    /// Returns the first runtime error.
    pub async fn stop(&self) -> Result<Vec<String>> {
        let mut stopped = Vec::new();
        for container in self.running().await? {
            self.runtime.stop_container(&container.id).await?;
            stopped.push(container.short_id().to_string());
        }

        info!("Cluster '{}' stopped ({})", self.config.name, stopped.len());
        Ok(stopped)
    }

    /// Force-remove every member. Returns the short ids that were removed.
    ///
    /// # Errors
    ///
    /// Returns the first runtime error.
    pub async fn delete(&self) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for container in self.list().await? {
            self.runtime.remove_container(&container.id, true).await?;
            removed.push(container.short_id().to_string());
        }

        info!("Cluster '{}' deleted ({})", self.config.name, removed.len());
        Ok(removed)
    }

    /// Create the shared data volume. Returns its name.
    ///
    /// # Errors
    ///
    /// Returns error if volume creation fails.
    pub async fn create_volume(&self) -> Result<String> {
        let volume = VolumeConfig {
            name: self.config.volume.name.clone(),
            driver: self.config.volume.driver.clone(),
            labels: HashMap::from([(self.config.label_key.clone(), self.config.name.clone())]),
        };
        Ok(self.runtime.create_volume(&volume).await?)
    }

    /// Generate `size` random values and write them into the data volume.
    ///
    /// The values are uploaded through a short-lived helper container that
    /// mounts the volume; the helper is removed whether or not the upload
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the value range is empty, the helper image is
    /// unavailable, or any runtime call fails.
    pub async fn generate(&self, size: usize, seed: Option<u64>) -> Result<GenerateReport> {
        let settings = &self.config.data;
        if settings.value_min >= settings.value_max {
            return Err(ClusterError::InvalidValueRange {
                min: settings.value_min,
                max: settings.value_max,
            });
        }

        let values = data::generate_values(size, settings.value_min..settings.value_max, seed);
        let contents = data::render_values(&values);
        let archive = data::build_archive(&settings.file_name, &contents)?;

        self.ensure_image(&self.config.image).await?;

        let helper = ContainerConfig::builder()
            .image(&self.config.image)
            .cmd(["sleep", "infinity"])
            .bind(self.config.volume.bind())
            .build()?;

        let helper_id = self.runtime.create_container(&helper).await?;
        debug!("Data helper container created: {}", helper_id);

        let mount = &self.config.volume.mount_path;
        let upload: crate::container::Result<()> = async {
            self.runtime.start_container(&helper_id).await?;
            self.runtime.upload_archive(&helper_id, mount, archive).await
        }
        .await;

        if let Err(e) = self.runtime.remove_container(&helper_id, true).await {
            warn!("Failed to remove data helper {}: {}", helper_id, e);
        }
        upload?;

        let path = format!("{}/{}", mount.trim_end_matches('/'), settings.file_name);
        info!("Generated {} values into {}:{}", size, self.config.volume.name, path);

        Ok(GenerateReport {
            volume: self.config.volume.name.clone(),
            path,
            values: size,
            bytes: contents.len(),
        })
    }

    /// Copy the dataset from the volume into each running member.
    ///
    /// # Errors
    ///
    /// Returns the first runtime error.
    pub async fn distribute(&self) -> Result<Vec<CommandOutput>> {
        let mut outputs = Vec::new();

        for container in self.running().await? {
            let command = render_template(
                &self.config.data.distribute_command,
                &[
                    ("id", container.short_id()),
                    ("mount", self.config.volume.mount_path.trim_end_matches('/')),
                    ("file", self.config.data.file_name.as_str()),
                ],
            );
            let exec = ExecConfig::builder().shell(command).build();
            let output = self.runtime.exec(&container.id, &exec).await?;
            if output.exit_code.is_some_and(|code| code != 0) {
                warn!(
                    "Distribution to {} exited with {:?}: {}",
                    container.short_id(),
                    output.exit_code,
                    output.stderr.trim()
                );
            }
            outputs.push(CommandOutput::new(&container, output));
        }

        info!("Data distributed to {} containers", outputs.len());
        Ok(outputs)
    }

    /// Fan the worker command out across running members, one even slice of
    /// `[0, size)` each, and collect their statistics.
    ///
    /// A member whose exec call errors, whose command fails or whose output
    /// does not decode is recorded as failed; the others still run.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::NoRunningContainers`] if nothing is running, or
    /// an error if listing the members fails.
    pub async fn process(&self, size: u64) -> Result<ProcessReport> {
        let members = self.running().await?;
        if members.is_empty() {
            return Err(ClusterError::NoRunningContainers(self.config.name.clone()));
        }

        let ranges = stats::partition(size, members.len());
        let mut workers = Vec::with_capacity(members.len());

        for (container, range) in members.iter().zip(ranges) {
            let start = range.start.to_string();
            let end = range.end.to_string();
            let command = render_template(
                &self.config.data.worker_command,
                &[
                    ("id", container.short_id()),
                    ("start", start.as_str()),
                    ("end", end.as_str()),
                    ("mount", self.config.volume.mount_path.trim_end_matches('/')),
                    ("file", self.config.data.file_name.as_str()),
                ],
            );
            debug!("Worker {} processing {:?}", container.short_id(), range);

            let exec = ExecConfig::builder().shell(command).build();
            let outcome = match self.runtime.exec(&container.id, &exec).await {
                Err(e) => WorkerOutcome::Failed {
                    error: e.to_string(),
                    output: String::new(),
                },
                Ok(output) if output.exit_code.is_some_and(|code| code != 0) => {
                    WorkerOutcome::Failed {
                        error: format!("worker exited with code {:?}", output.exit_code),
                        output: output.combined(),
                    }
                }
                Ok(output) => match WorkerStats::parse(&output.stdout) {
                    Ok(stats) => WorkerOutcome::Completed(stats),
                    Err(e) => WorkerOutcome::Failed {
                        error: e.to_string(),
                        output: output.combined(),
                    },
                },
            };

            if let WorkerOutcome::Failed { error, .. } = &outcome {
                warn!("Worker {} failed: {}", container.short_id(), error);
            }

            workers.push(WorkerResult {
                container: container.short_id().to_string(),
                start: range.start,
                end: range.end,
                outcome,
            });
        }

        let completed: Vec<(u64, WorkerStats)> = workers
            .iter()
            .filter_map(|w| match &w.outcome {
                WorkerOutcome::Completed(stats) => Some((w.len(), *stats)),
                WorkerOutcome::Failed { .. } => None,
            })
            .collect();

        info!(
            "Processing completed: {}/{} workers succeeded",
            completed.len(),
            workers.len()
        );

        Ok(ProcessReport {
            size,
            summary: ClusterSummary::combine(&completed),
            workers,
        })
    }
}
