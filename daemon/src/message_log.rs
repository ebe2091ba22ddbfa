//! Append-only record of accepted messages.
//!
//! One bounded write per record, file opened and closed per append, so
//! concurrent requests interleave whole lines rather than corrupting each
//! other. The log is never read back by the daemon.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use log::warn;
use tokio::io::AsyncWriteExt;

use crate::config::Config;

pub struct MessageLog {
    path: Option<PathBuf>,
}

impl MessageLog {
    pub fn from_config(config: &Config) -> Self {
        Self {
            path: config.log_enabled.then(|| PathBuf::from(&config.log_file)),
        }
    }

    /// Record an accepted message. Failures are reported to the operator log
    /// and swallowed; the request that produced the record must not fail
    /// because of them.
    pub async fn append(&self, source: IpAddr, text: &str) {
        let Some(path) = &self.path else { return };
        if let Err(e) = try_append(path, source, text).await {
            warn!("error writing to message log: {e:#}");
        }
    }
}

async fn try_append(path: &Path, source: IpAddr, text: &str) -> Result<()> {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let record = format!("{timestamp} - {source} - {text}\n");
    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    file.write_all(record.as_bytes())
        .await
        .context("appending record")?;
    Ok(())
}
