//! JSON status file sink for an external renderer.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Frame;
use crate::error::Result;
use crate::port::FrameSink;

/// Current status file format version.
const STATUS_VERSION: &str = "1";

#[derive(Serialize)]
struct StatusFile<'a> {
    version: &'static str,
    started_at: DateTime<Utc>,
    pid: u32,
    frame: &'a Frame,
}

/// Writes every frame to a JSON file, replacing it atomically.
pub struct StatusFileSink {
    path: PathBuf,
    started_at: DateTime<Utc>,
}

impl StatusFileSink {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            started_at: Utc::now(),
        }
    }

    /// Write-to-temp-then-rename. Creates the parent directory if needed.
    fn write(&self, frame: &Frame) -> Result<()> {
        let status = StatusFile {
            version: STATUS_VERSION,
            started_at: self.started_at,
            pid: std::process::id(),
            frame,
        };
        let json = serde_json::to_string_pretty(&status)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }
}

impl FrameSink for StatusFileSink {
    fn name(&self) -> &'static str {
        "status_file"
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.write(frame)
    }
}
