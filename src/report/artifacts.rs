use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, TrainError};
use crate::model::StateDict;
use crate::report::confusion::ConfusionMatrix;
use crate::report::svg::{render_confusion_matrix, render_line_chart, Series};

pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "logs.txt";
pub const CHECKPOINT_FILE: &str = "checkpoint.json";
pub const LOSS_CURVE_FILE: &str = "train_loss.svg";
pub const ACCURACY_CURVE_FILE: &str = "trainval_accuracy.svg";
pub const CONFUSION_MATRIX_FILE: &str = "confusion_matrix.svg";

/// Destination for everything a run persists. Each call replaces the
/// previous artifact of the same kind.
pub trait ArtifactSink {
    fn save_checkpoint(&mut self, state: &StateDict) -> Result<()>;

    fn save_confusion_matrix(&mut self, matrix: &ConfusionMatrix, classes: &[String]) -> Result<()>;

    fn save_loss_curve(&mut self, train_loss: &[f64]) -> Result<()>;

    fn save_accuracy_curves(&mut self, train_accuracy: &[f64], val_accuracy: &[f64]) -> Result<()>;
}

/// A run's output directory on disk.
#[derive(Debug, Clone)]
pub struct RunDirectory {
    root: PathBuf,
}

impl RunDirectory {
    /// Creates the directory, refusing to reuse one that already exists.
    pub fn create(root: impl Into<PathBuf>) -> Result<RunDirectory> {
        let root = root.into();
        if root.exists() {
            return Err(TrainError::OutputConflict(root));
        }
        fs::create_dir_all(&root)?;
        Ok(RunDirectory { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Writes `value` as pretty JSON. Used once for the config snapshot.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let file = fs::File::create(self.path(name))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, value)?;
        Ok(())
    }

    /// Replaces `name` via a temporary sibling so readers never see a
    /// half-written file.
    fn replace(&self, name: &str, contents: &[u8]) -> Result<()> {
        let tmp = self.path(&format!("{name}.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, self.path(name))?;
        Ok(())
    }
}

impl ArtifactSink for RunDirectory {
    fn save_checkpoint(&mut self, state: &StateDict) -> Result<()> {
        self.replace(CHECKPOINT_FILE, &state.to_bytes()?)
    }

    fn save_confusion_matrix(&mut self, matrix: &ConfusionMatrix, classes: &[String]) -> Result<()> {
        self.replace(CONFUSION_MATRIX_FILE, render_confusion_matrix(matrix, classes).as_bytes())
    }

    fn save_loss_curve(&mut self, train_loss: &[f64]) -> Result<()> {
        let svg = render_line_chart("Training loss", "Average loss", &[
            Series { label: "Train loss", values: train_loss, color: "black" },
        ]);
        self.replace(LOSS_CURVE_FILE, svg.as_bytes())
    }

    fn save_accuracy_curves(&mut self, train_accuracy: &[f64], val_accuracy: &[f64]) -> Result<()> {
        let svg = render_line_chart("Accuracy", "Accuracy (%)", &[
            Series { label: "Train accuracy", values: train_accuracy, color: "green" },
            Series { label: "Validation accuracy", values: val_accuracy, color: "blue" },
        ]);
        self.replace(ACCURACY_CURVE_FILE, svg.as_bytes())
    }
}
