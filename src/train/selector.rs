use crate::error::Result;
use crate::model::Model;
use crate::report::{ArtifactSink, ConfusionMatrix};
use crate::train::metrics::PredictionLog;

/// Tracks the best validation accuracy of the run and persists the model
/// whenever it is beaten.
///
/// Only a strict improvement counts: an epoch that ties the best keeps the
/// earlier checkpoint.
#[derive(Debug, Clone)]
pub struct BestModelSelector {
    best_accuracy: f64,
    classes: Vec<String>,
}

impl BestModelSelector {
    pub fn new(classes: Vec<String>) -> BestModelSelector {
        BestModelSelector { best_accuracy: 0.0, classes }
    }

    pub fn best_accuracy(&self) -> f64 {
        self.best_accuracy
    }

    /// Compares `accuracy` against the best so far. On a strict improvement,
    /// records it, writes a checkpoint and renders the confusion matrix of
    /// `predictions`. Returns whether that happened.
    pub fn consider<M, S>(
        &mut self,
        accuracy: f64,
        predictions: &PredictionLog,
        model: &M,
        sink: &mut S,
    ) -> Result<bool>
    where
        M: Model + ?Sized,
        S: ArtifactSink + ?Sized,
    {
        if !(accuracy > self.best_accuracy) {
            return Ok(false);
        }

        let previous = self.best_accuracy;
        self.best_accuracy = accuracy;

        sink.save_checkpoint(&model.state_dict())?;
        let matrix = ConfusionMatrix::from_predictions(
            &predictions.predicted,
            &predictions.truth,
            self.classes.len(),
        )?;
        sink.save_confusion_matrix(&matrix, &self.classes)?;

        log::info!(
            "New best validation accuracy {:.2}% (previous {:.2}%), checkpoint saved",
            accuracy,
            previous
        );
        Ok(true)
    }
}
