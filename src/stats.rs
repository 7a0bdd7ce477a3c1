//! Work partitioning and result aggregation.
//!
//! A data range of `size` items is split evenly across the workers; each
//! worker prints five newline-separated numbers (sum, average, max, min,
//! standard deviation) that are decoded into [`WorkerStats`] and pooled into a
//! [`ClusterSummary`].

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Order in which a worker prints its statistics.
pub const STAT_FIELDS: [&str; 5] = ["sum", "average", "max", "min", "standard_deviation"];

/// Errors decoding worker output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Output ended before the named statistic
    #[error("worker output is missing the {0} line")]
    MissingField(&'static str),

    /// A line could not be parsed as a number
    #[error("worker output has an invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Split `[0, size)` into `workers` contiguous ranges.
///
/// Every range holds `size / workers` items except the last, which runs to
/// `size` and so absorbs the remainder. Returns an empty vector for zero
/// workers.
pub fn partition(size: u64, workers: usize) -> Vec<Range<u64>> {
    if workers == 0 {
        return Vec::new();
    }

    let count = workers as u64;
    let per_worker = size / count;

    (0..count)
        .map(|idx| {
            let start = idx * per_worker;
            let end = if idx == count - 1 {
                size
            } else {
                (idx + 1) * per_worker
            };
            start..end
        })
        .collect()
}

/// Statistics reported by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub sum: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub standard_deviation: f64,
}

impl WorkerStats {
    /// Decode the five statistics from raw worker output.
    ///
    /// Surrounding whitespace is ignored and lines beyond the fifth are
    /// discarded.
    pub fn parse(output: &str) -> Result<Self, StatsError> {
        let mut lines = output.trim().lines().map(str::trim);
        let mut values = [0.0_f64; 5];

        for (slot, field) in values.iter_mut().zip(STAT_FIELDS) {
            let line = lines
                .next()
                .filter(|line| !line.is_empty())
                .ok_or(StatsError::MissingField(field))?;
            *slot = line.parse().map_err(|_| StatsError::InvalidNumber {
                field,
                value: line.to_string(),
            })?;
        }

        let [sum, average, max, min, standard_deviation] = values;
        Ok(Self {
            sum,
            average,
            max,
            min,
            standard_deviation,
        })
    }
}

/// Pooled statistics across all workers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub count: u64,
    pub sum: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    /// Population standard deviation of the pooled data.
    pub standard_deviation: f64,
}

impl ClusterSummary {
    /// Pool per-worker statistics, each paired with the number of items the
    /// worker processed.
    ///
    /// Workers with an empty range are skipped. Returns `None` when no items
    /// were processed at all.
    pub fn combine(workers: &[(u64, WorkerStats)]) -> Option<Self> {
        let populated: Vec<_> = workers.iter().filter(|(count, _)| *count > 0).collect();
        let count: u64 = populated.iter().map(|(count, _)| count).sum();
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let sum: f64 = populated.iter().map(|(_, stats)| stats.sum).sum();
        let average = sum / n;

        // E[x^2] per worker is var + mean^2
        let second_moment: f64 = populated
            .iter()
            .map(|(count, stats)| {
                *count as f64
                    * (stats.standard_deviation.powi(2) + stats.average.powi(2))
            })
            .sum::<f64>()
            / n;
        let variance = (second_moment - average.powi(2)).max(0.0);

        let max = populated
            .iter()
            .map(|(_, stats)| stats.max)
            .fold(f64::NEG_INFINITY, f64::max);
        let min = populated
            .iter()
            .map(|(_, stats)| stats.min)
            .fold(f64::INFINITY, f64::min);

        Some(Self {
            count,
            sum,
            average,
            max,
            min,
            standard_deviation: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_of(values: &[f64]) -> WorkerStats {
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let average = sum / n;
        let variance = values.iter().map(|v| (v - average).powi(2)).sum::<f64>() / n;
        WorkerStats {
            sum,
            average,
            max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            min: values.iter().cloned().fold(f64::INFINITY, f64::min),
            standard_deviation: variance.sqrt(),
        }
    }

    #[test]
    fn test_partition_even() {
        let ranges = partition(100_000, 8);
        assert_eq!(ranges.len(), 8);
        assert_eq!(ranges[0], 0..12_500);
        assert_eq!(ranges[7], 87_500..100_000);
    }

    #[test]
    fn test_partition_last_absorbs_remainder() {
        let ranges = partition(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);

        let covered: u64 = ranges.iter().map(|r| r.end - r.start).sum();
        assert_eq!(covered, 10);
    }

    #[test]
    fn test_partition_more_workers_than_items() {
        let ranges = partition(2, 4);
        assert_eq!(ranges, vec![0..0, 0..0, 0..0, 0..2]);
    }

    #[test]
    fn test_partition_no_workers() {
        assert!(partition(100, 0).is_empty());
    }

    #[test]
    fn test_parse_worker_output() {
        let stats = WorkerStats::parse("  4950.0\n49.5\n99\n0\n28.86607004772212\n").unwrap();
        assert_eq!(stats.sum, 4950.0);
        assert_eq!(stats.average, 49.5);
        assert_eq!(stats.max, 99.0);
        assert_eq!(stats.min, 0.0);
        assert!((stats.standard_deviation - 28.866_070_047_722_12).abs() < 1e-12);
    }

    #[test]
    fn test_parse_ignores_trailing_lines_and_crlf() {
        let stats = WorkerStats::parse("1\r\n1\r\n1\r\n1\r\n0\r\ndone\r\n").unwrap();
        assert_eq!(stats.sum, 1.0);
        assert_eq!(stats.standard_deviation, 0.0);
    }

    #[test]
    fn test_parse_missing_field() {
        let err = WorkerStats::parse("10\n2\n5\n").unwrap_err();
        assert_eq!(err, StatsError::MissingField("min"));

        let err = WorkerStats::parse("").unwrap_err();
        assert_eq!(err, StatsError::MissingField("sum"));
    }

    #[test]
    fn test_parse_invalid_number() {
        let err = WorkerStats::parse("10\nabc\n5\n1\n0\n").unwrap_err();
        assert_eq!(
            err,
            StatsError::InvalidNumber {
                field: "average",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_combine_matches_direct_computation() {
        let left = [1.0, 2.0, 3.0, 4.0];
        let right = [10.0, 20.0];
        let all: Vec<f64> = left.iter().chain(right.iter()).cloned().collect();

        let summary =
            ClusterSummary::combine(&[(4, stats_of(&left)), (2, stats_of(&right))]).unwrap();
        let direct = stats_of(&all);

        assert_eq!(summary.count, 6);
        assert!((summary.sum - direct.sum).abs() < 1e-9);
        assert!((summary.average - direct.average).abs() < 1e-9);
        assert!((summary.standard_deviation - direct.standard_deviation).abs() < 1e-9);
        assert_eq!(summary.max, 20.0);
        assert_eq!(summary.min, 1.0);
    }

    #[test]
    fn test_combine_skips_empty_ranges() {
        let nan_stats = WorkerStats {
            sum: 0.0,
            average: f64::NAN,
            max: f64::NAN,
            min: f64::NAN,
            standard_deviation: f64::NAN,
        };
        let summary =
            ClusterSummary::combine(&[(0, nan_stats), (3, stats_of(&[5.0, 5.0, 5.0]))]).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, 5.0);
        assert_eq!(summary.standard_deviation, 0.0);
    }

    #[test]
    fn test_combine_nothing() {
        assert!(ClusterSummary::combine(&[]).is_none());
    }
}
