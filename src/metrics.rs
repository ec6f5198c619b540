//! Run statistics for the report pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Pipeline stages timed per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Normalize,
    Validate,
    Coerce,
    Predict,
    Render,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Normalize => "normalize",
            Stage::Validate => "validate",
            Stage::Coerce => "coerce",
            Stage::Predict => "predict",
            Stage::Render => "render",
        }
    }
}

/// Counters shared by every pipeline run that has them attached.
///
/// Purely observational: nothing in the pipeline reads these back.
pub struct PipelineMetrics {
    pub batches_processed: AtomicU64,
    pub rows_labelled: AtomicU64,
    pub fraud_rows: AtomicU64,
    /// Failed runs by error kind
    failures_by_kind: RwLock<HashMap<&'static str, u64>>,
    /// Stage durations (in microseconds)
    stage_times: RwLock<HashMap<Stage, Vec<u64>>>,
    start_time: Instant,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            batches_processed: AtomicU64::new(0),
            rows_labelled: AtomicU64::new(0),
            fraud_rows: AtomicU64::new(0),
            failures_by_kind: RwLock::new(HashMap::new()),
            stage_times: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record a successfully labelled batch
    pub fn record_batch(&self, rows: usize, fraud: usize) {
        self.batches_processed.fetch_add(1, Ordering::Relaxed);
        self.rows_labelled.fetch_add(rows as u64, Ordering::Relaxed);
        self.fraud_rows.fetch_add(fraud as u64, Ordering::Relaxed);
    }

    /// Record a failed run
    pub fn record_failure(&self, kind: &'static str) {
        if let Ok(mut by_kind) = self.failures_by_kind.write() {
            *by_kind.entry(kind).or_insert(0) += 1;
        }
    }

    /// Record how long a stage took
    pub fn record_stage(&self, stage: Stage, duration: Duration) {
        if let Ok(mut times) = self.stage_times.write() {
            let stage_times = times.entry(stage).or_default();
            stage_times.push(duration.as_micros() as u64);
            // Keep only the most recent 1000 per stage
            if stage_times.len() > 1000 {
                stage_times.drain(0..500);
            }
        }
    }

    pub fn get_failures(&self) -> HashMap<&'static str, u64> {
        self.failures_by_kind
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Per-stage timing statistics
    pub fn get_stage_stats(&self) -> HashMap<Stage, StageStats> {
        let Ok(times) = self.stage_times.read() else {
            return HashMap::new();
        };

        times
            .iter()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(stage, samples)| {
                let mut sorted = samples.clone();
                sorted.sort_unstable();
                let count = sorted.len();
                let sum: u64 = sorted.iter().sum();
                (
                    *stage,
                    StageStats {
                        calls: count as u64,
                        mean_us: sum / count as u64,
                        p50_us: sorted[count / 2],
                        max_us: sorted[count - 1],
                    },
                )
            })
            .collect()
    }

    /// Labelled rows per second since creation
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.rows_labelled.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let batches = self.batches_processed.load(Ordering::Relaxed);
        let rows = self.rows_labelled.load(Ordering::Relaxed);
        let fraud = self.fraud_rows.load(Ordering::Relaxed);
        let fraud_rate = if rows > 0 {
            (fraud as f64 / rows as f64) * 100.0
        } else {
            0.0
        };

        info!(
            batches = batches,
            rows = rows,
            fraud = fraud,
            fraud_rate = format!("{:.1}%", fraud_rate),
            throughput = format!("{:.1} rows/s", self.get_throughput()),
            "Pipeline summary"
        );

        for (kind, count) in self.get_failures() {
            info!(kind = kind, count = count, "Pipeline failures");
        }

        let mut stages: Vec<(Stage, StageStats)> = self.get_stage_stats().into_iter().collect();
        stages.sort_by_key(|(stage, _)| *stage as u8);
        for (stage, stats) in stages {
            info!(
                stage = stage.as_str(),
                calls = stats.calls,
                mean_us = stats.mean_us,
                p50_us = stats.p50_us,
                max_us = stats.max_us,
                "Stage timing"
            );
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing statistics for one stage
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StageStats {
    pub calls: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        metrics.record_batch(3, 2);
        metrics.record_batch(1, 0);
        metrics.record_failure("schema");
        metrics.record_failure("schema");

        assert_eq!(metrics.batches_processed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.rows_labelled.load(Ordering::Relaxed), 4);
        assert_eq!(metrics.fraud_rows.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.get_failures().get("schema"), Some(&2));
    }

    #[test]
    fn test_stage_stats() {
        let metrics = PipelineMetrics::new();
        for us in [100, 300, 200] {
            metrics.record_stage(Stage::Render, Duration::from_micros(us));
        }

        let stats = metrics.get_stage_stats();
        let render = stats.get(&Stage::Render).unwrap();
        assert_eq!(render.calls, 3);
        assert_eq!(render.mean_us, 200);
        assert_eq!(render.p50_us, 200);
        assert_eq!(render.max_us, 300);
        assert!(!stats.contains_key(&Stage::Predict));
    }
}
