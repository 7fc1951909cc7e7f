use crate::data::{DataLoader, Dataset};
use crate::error::Result;
use crate::loss::NllLoss;
use crate::model::{Mode, Model};
use crate::train::epoch_stats::EpochStats;
use crate::train::metrics::{MetricAccumulator, PredictionLog};
use crate::train::run_log::RunLog;
use crate::train::train_epoch::{class_scores, RULE};

/// Everything a validation pass hands to the best-model selector.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub stats: EpochStats,
    pub correct: usize,
    pub total: usize,
    pub predictions: PredictionLog,
}

impl ValidationOutcome {
    pub fn accuracy(&self) -> f64 {
        self.stats.accuracy
    }
}

/// Runs one forward-only pass over the validation stream in evaluation mode.
///
/// No gradients are computed and no parameters change. Predictions and
/// labels are collected for the confusion matrix.
pub fn validate_epoch<M, D>(
    model: &mut M,
    loader: &mut DataLoader<D>,
    num_classes: usize,
    log: &RunLog,
) -> Result<ValidationOutcome>
where
    M: Model + ?Sized,
    D: Dataset,
{
    let total = loader.dataset_len();
    let mut metrics = MetricAccumulator::new("val");
    let mut predictions = PredictionLog::default();

    model.set_mode(Mode::Eval);
    for batch in loader.batches() {
        let batch = batch?;

        let output = model.forward(&batch.inputs)?;
        let scores = class_scores(&output.scores, num_classes)?;
        let loss = NllLoss::loss(&scores, &batch.labels)?;
        let predicted = scores.argmax_rows();

        metrics.observe(loss, &predicted, &batch.labels)?;
        predictions.extend(&predicted, &batch.labels);

        log.console(&format!("Done with image {} out of {}...", metrics.seen(), total));
    }

    let stats = metrics.finalize(total)?;

    log.record(RULE)?;
    log.record(&format!("Predicted {} out of {}", metrics.correct(), total))?;
    log.record(&format!("Validation accuracy = {:.2}%", stats.accuracy))?;
    log.record(RULE)?;

    Ok(ValidationOutcome {
        stats,
        correct: metrics.correct(),
        total,
        predictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryDataset;
    use crate::error::TrainError;
    use crate::model::{GazeNet, ModelVariant};

    #[test]
    fn leaves_parameters_untouched() {
        let mut model = GazeNet::new(ModelVariant::V1_1, 2, 3, 9);
        let before = model.state_dict();
        let ds = InMemoryDataset::new(
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.5, 0.5]],
            vec![0, 1, 2],
        )
        .unwrap();
        let mut loader = DataLoader::new(ds, 2, false, 0);

        let outcome = validate_epoch(&mut model, &mut loader, 3, &RunLog::console_only()).unwrap();

        assert_eq!(model.state_dict(), before);
        assert_eq!(model.mode(), Mode::Eval);
        assert_eq!(outcome.predictions.len(), 3);
        assert_eq!(outcome.predictions.truth, vec![0, 1, 2]);
        assert!(outcome.correct <= outcome.total);
        assert!((0.0..=100.0).contains(&outcome.accuracy()));
    }

    #[test]
    fn empty_validation_stream_fails() {
        let mut model = GazeNet::new(ModelVariant::V1_1, 2, 3, 9);
        let mut loader = DataLoader::new(InMemoryDataset::default(), 2, false, 0);
        assert!(matches!(
            validate_epoch(&mut model, &mut loader, 3, &RunLog::console_only()),
            Err(TrainError::EmptyDataset { .. })
        ));
    }
}
