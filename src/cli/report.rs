//! Human-readable rendering of cluster operation results.

use crate::cluster::{CommandOutput, ProcessReport, WorkerOutcome};
use crate::container::ContainerSummary;
use crate::stats::{ClusterSummary, WorkerStats};
use std::fmt::Write;

/// Listing of cluster members, one per line.
pub fn render_members(members: &[ContainerSummary]) -> String {
    let mut out = String::from("Current containers in the cluster:\n");
    for member in members {
        let _ = writeln!(
            out,
            "{:<12}  {:<10} {}",
            member.short_id(),
            member.state,
            member.image
        );
    }
    out
}

/// Per-container command output, followed by a completion line.
pub fn render_command_outputs(command: &str, outputs: &[CommandOutput]) -> String {
    let mut out = String::new();
    for output in outputs {
        let _ = writeln!(out, "Output for container {}:", output.container);
        for stream in [&output.stdout, &output.stderr] {
            if stream.is_empty() {
                continue;
            }
            out.push_str(stream);
            if !stream.ends_with('\n') {
                out.push('\n');
            }
        }
        if output.stdout.is_empty() && output.stderr.is_empty() {
            out.push('\n');
        }
        if let Some(code) = output.exit_code.filter(|code| *code != 0) {
            let _ = writeln!(out, "(exit code {})", code);
        }
    }
    let _ = writeln!(out, "Command '{}' executed in all containers.", command);
    out
}

fn write_stats(out: &mut String, stats: &WorkerStats) {
    let _ = writeln!(out, "Sum: {}", stats.sum);
    let _ = writeln!(out, "Average: {}", stats.average);
    let _ = writeln!(out, "Max: {}", stats.max);
    let _ = writeln!(out, "Min: {}", stats.min);
    let _ = writeln!(out, "Standard Deviation: {}", stats.standard_deviation);
}

fn write_summary(out: &mut String, summary: &ClusterSummary) {
    let _ = writeln!(out, "Cluster summary ({} values):", summary.count);
    let _ = writeln!(out, "Sum: {}", summary.sum);
    let _ = writeln!(out, "Average: {}", summary.average);
    let _ = writeln!(out, "Max: {}", summary.max);
    let _ = writeln!(out, "Min: {}", summary.min);
    let _ = writeln!(out, "Standard Deviation: {}", summary.standard_deviation);
}

/// Per-container statistics and the pooled summary.
pub fn render_process_report(report: &ProcessReport) -> String {
    let mut out = String::from("Processing completed in containers. Results:\n");

    for worker in &report.workers {
        match &worker.outcome {
            WorkerOutcome::Completed(stats) => {
                let _ = writeln!(
                    out,
                    "Container {} [{}, {}):",
                    worker.container, worker.start, worker.end
                );
                write_stats(&mut out, stats);
            }
            WorkerOutcome::Failed { error, output } => {
                let _ = writeln!(
                    out,
                    "Container {} [{}, {}): failed: {}",
                    worker.container, worker.start, worker.end, error
                );
                for line in output.lines().take(5) {
                    let _ = writeln!(out, "  | {}", line);
                }
            }
        }
    }

    if let Some(summary) = &report.summary {
        write_summary(&mut out, summary);
    }
    out
}
