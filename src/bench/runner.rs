//! Load Generation
//!
//! Runs predict workloads against the cluster and folds the outcomes into
//! `BenchmarkRecord`s.
//!
//! ## Responsibilities
//! - **Sequential runs**: a single private client issuing calls one after another.
//! - **Concurrent runs**: spawning the worker pool, collecting samples over a channel
//!   in one aggregator, joining every worker before the record is finalized.
//! - **Progress**: lock-free counters any task may poll while a run is active.

use super::report::write_report;
use super::stats::{Sample, Tally};
use super::types::{BenchmarkRecord, ConcurrentRun, Report, SequentialRun, now_ms};
use crate::client::client::ClusterClient;
use crate::client::config::ClientConfig;
use crate::cluster::registry::NodeRegistry;

use anyhow::{Result, bail};
use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::mpsc;

/// Capacity of the worker -> aggregator sample channel
const SAMPLE_CHANNEL_CAPACITY: usize = 1024;

/// Live counters of the run in progress.
#[derive(Debug, Default)]
pub struct Progress {
    target: AtomicUsize,
    completed: AtomicUsize,
    errors: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub target: usize,
    pub completed: usize,
    pub errors: usize,
}

impl Progress {
    fn reset(&self, target: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
        self.target.store(target, Ordering::Relaxed);
    }

    fn observe(&self, sample: &Sample) {
        if matches!(sample, Sample::Failure) {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            target: self.target.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

pub struct BenchmarkHarness {
    registry: Arc<NodeRegistry>,
    client_config: ClientConfig,
    progress: Arc<Progress>,
    last_sequential: Option<BenchmarkRecord>,
    last_concurrent: Option<BenchmarkRecord>,
}

impl BenchmarkHarness {
    pub fn new(registry: Arc<NodeRegistry>, client_config: ClientConfig) -> Self {
        Self {
            registry,
            client_config,
            progress: Arc::new(Progress::default()),
            last_sequential: None,
            last_concurrent: None,
        }
    }

    /// Handle for polling progress from another task while a run is active.
    pub fn progress(&self) -> Arc<Progress> {
        self.progress.clone()
    }

    pub fn last_sequential(&self) -> Option<&BenchmarkRecord> {
        self.last_sequential.as_ref()
    }

    pub fn last_concurrent(&self) -> Option<&BenchmarkRecord> {
        self.last_concurrent.as_ref()
    }

    /// Issues `run.requests` predict calls one after another on a single client.
    pub async fn run_sequential(&mut self, run: &SequentialRun) -> Result<BenchmarkRecord> {
        if run.input_size == 0 {
            bail!("Input size must be at least 1");
        }

        tracing::info!(
            "Sequential run: {} request(s) against model '{}'",
            run.requests,
            run.model_id
        );

        self.progress.reset(run.requests);
        let mut client = ClusterClient::new(self.registry.clone(), self.client_config.clone());
        let mut tally = Tally::new();

        let started = Instant::now();
        for _ in 0..run.requests {
            let sample = timed_predict(&mut client, &run.model_id, run.input_size).await;
            self.progress.observe(&sample);
            tally.record(sample);
        }
        let record = tally.finish(started.elapsed());

        client.close();
        log_record("Sequential", &record);

        self.last_sequential = Some(record.clone());
        Ok(record)
    }

    /// Splits `run.requests` across `run.workers` independent workers.
    ///
    /// Each worker gets `requests / workers` calls; the remainder is not issued,
    /// so `record.total` equals `run.issued()`.
    pub async fn run_concurrent(&mut self, run: &ConcurrentRun) -> Result<BenchmarkRecord> {
        if run.workers == 0 {
            bail!("Concurrent run needs at least one worker");
        }
        if run.input_size == 0 {
            bail!("Input size must be at least 1");
        }

        let per_worker = run.per_worker();
        let dropped = run.requests - run.issued();
        if dropped > 0 {
            tracing::warn!(
                "{} request(s) not divisible across {} workers; {} will not be issued",
                run.requests,
                run.workers,
                dropped
            );
        }

        tracing::info!(
            "Concurrent run: {} worker(s) x {} request(s) against model '{}'",
            run.workers,
            per_worker,
            run.model_id
        );

        self.progress.reset(run.issued());
        let (tx, mut rx) = mpsc::channel::<Sample>(SAMPLE_CHANNEL_CAPACITY);

        let started = Instant::now();
        let mut handles = Vec::new();

        for worker_id in 0..run.workers {
            let tx = tx.clone();
            let registry = self.registry.clone();
            let config = self.client_config.clone();
            let model_id = run.model_id.clone();
            let input_size = run.input_size;

            handles.push(tokio::spawn(async move {
                let mut client = ClusterClient::new(registry, config);

                for _ in 0..per_worker {
                    let sample = timed_predict(&mut client, &model_id, input_size).await;
                    if tx.send(sample).await.is_err() {
                        break;
                    }
                }

                client.close();
                tracing::debug!("Worker {} finished", worker_id);
            }));
        }

        // Only worker senders remain; the channel closes once they are all done
        drop(tx);

        let mut tally = Tally::new();
        while let Some(sample) = rx.recv().await {
            self.progress.observe(&sample);
            tally.record(sample);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Benchmark worker failed: {}", e);
            }
        }

        let record = tally.finish(started.elapsed());
        log_record("Concurrent", &record);

        self.last_concurrent = Some(record.clone());
        Ok(record)
    }

    /// Folds the latest sequential and concurrent records into a timestamped report.
    pub fn report(&self) -> Result<Report> {
        let Some(sequential) = self.last_sequential.clone() else {
            bail!("No sequential run recorded");
        };
        let Some(concurrent) = self.last_concurrent.clone() else {
            bail!("No concurrent run recorded");
        };

        Ok(Report {
            timestamp: now_ms(),
            sequential,
            concurrent,
        })
    }

    /// Builds the report and persists it under `dir`.
    pub async fn write_report(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let report = self.report()?;
        let path = write_report(&report, dir.as_ref()).await?;
        tracing::info!("Benchmark report written to {}", path.display());
        Ok(path)
    }
}

/// One predict call with a fresh random input, timed from send to response.
async fn timed_predict(client: &mut ClusterClient, model_id: &str, input_size: usize) -> Sample {
    let input = random_vector(input_size);

    let started = Instant::now();
    match client.predict(model_id, &input).await {
        Ok(response) if response.success => Sample::Success(started.elapsed()),
        Ok(response) => {
            tracing::debug!("Predict rejected: {}", response.error.unwrap_or_default());
            Sample::Failure
        }
        Err(e) => {
            tracing::debug!("Predict failed: {}", e);
            Sample::Failure
        }
    }
}

fn random_vector(size: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen_range(0.0..1.0)).collect()
}

fn log_record(label: &str, record: &BenchmarkRecord) {
    tracing::info!(
        "{} run done: {}/{} ok, {} error(s) in {:.2}s ({:.2} req/s, avg {:.2} ms)",
        label,
        record.success,
        record.total,
        record.errors,
        record.duration,
        record.throughput,
        record.latency.avg
    );
}
