#![warn(missing_docs)]
//! Shared helpers for hit-testing tests: edge-loop checks, seeded camera
//! sweeps, a JSONL hit log and tracing setup.

mod cameras;
mod loops;

use anyhow::{Context, Result};
use glam::DVec2;
use meshpick_core::SurfaceId;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use cameras::*;
pub use loops::*;

/// One pointer query captured by a test or sweep.
#[derive(Debug, Serialize)]
pub struct HitRecord<'a> {
    /// Sequence number of the query.
    pub step: u64,
    /// Short label for the query kind (`"direct"`, `"captured"`, ...).
    pub kind: &'a str,
    /// Pointer position in viewport pixels.
    pub pointer: DVec2,
    /// Surface that answered, if any.
    pub surface: Option<SurfaceId>,
    /// Reported texture coordinate, if any.
    pub uv: Option<DVec2>,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create hit log {}", path.display()))?;
        Ok(Self { file })
    }

    /// Append one record to the log.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// Route `tracing` output through the test harness. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
