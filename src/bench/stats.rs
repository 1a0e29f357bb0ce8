//! Sample aggregation.
//!
//! A `Tally` is fed one `Sample` per completed request and folds them into a
//! `BenchmarkRecord` once the run is over. Latencies are kept only for
//! successful requests.

use super::types::{BenchmarkRecord, LatencyStats};

use std::time::Duration;

/// Result of a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Success(Duration),
    Failure,
}

#[derive(Debug, Default)]
pub struct Tally {
    success: usize,
    errors: usize,
    latencies_ms: Vec<f64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: Sample) {
        match sample {
            Sample::Success(latency) => {
                self.success += 1;
                self.latencies_ms.push(latency.as_nanos() as f64 / 1_000_000.0);
            }
            Sample::Failure => self.errors += 1,
        }
    }

    pub fn completed(&self) -> usize {
        self.success + self.errors
    }

    pub fn finish(self, elapsed: Duration) -> BenchmarkRecord {
        let total = self.completed();
        let duration = elapsed.as_secs_f64();
        let throughput = if duration > 0.0 {
            total as f64 / duration
        } else {
            0.0
        };

        BenchmarkRecord {
            total,
            success: self.success,
            errors: self.errors,
            duration,
            throughput,
            latency: latency_stats(self.latencies_ms),
        }
    }
}

/// Mean, median, min and max. All zero for an empty input.
pub fn latency_stats(mut values: Vec<f64>) -> LatencyStats {
    if values.is_empty() {
        return LatencyStats::default();
    }

    values.sort_by(f64::total_cmp);

    let count = values.len();
    let avg = values.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };

    LatencyStats {
        avg,
        median,
        min: values[0],
        max: values[count - 1],
    }
}
