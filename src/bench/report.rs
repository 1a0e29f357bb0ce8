//! Report persistence.
//!
//! Each benchmark invocation produces one JSON file named after its timestamp,
//! so successive runs never overwrite each other.

use super::types::Report;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const REPORT_PREFIX: &str = "benchmark_report";

/// Writes `report` into `dir` as `benchmark_report_<timestamp>.json`.
///
/// If that name is taken, `-1`, `-2`, ... is appended until a free one is found.
pub async fn write_report(report: &Report, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let json = serde_json::to_vec_pretty(report)?;

    let mut suffix = 0u32;
    loop {
        let name = if suffix == 0 {
            format!("{}_{}.json", REPORT_PREFIX, report.timestamp)
        } else {
            format!("{}_{}-{}.json", REPORT_PREFIX, report.timestamp, suffix)
        };
        let path = dir.join(name);

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(&json).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

pub async fn load_report(path: impl AsRef<Path>) -> Result<Report> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
