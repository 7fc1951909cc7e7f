use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Append-only training log.
///
/// `record` sends a line to the console (through `log`) and appends it to the
/// log file; `console` only reaches the console. The file is reopened in
/// append mode for every line and is never truncated.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    path: Option<PathBuf>,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> RunLog {
        RunLog { path: Some(path.into()) }
    }

    /// A log with no file sink.
    pub fn console_only() -> RunLog {
        RunLog { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record(&self, line: &str) -> Result<()> {
        log::info!("{line}");
        if let Some(path) = &self.path {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{line}")?;
        }
        Ok(())
    }

    pub fn console(&self, line: &str) {
        log::info!("{line}");
    }
}
