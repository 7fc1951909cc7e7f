use crate::data::{DataLoader, Dataset};
use crate::error::Result;
use crate::loss::NllLoss;
use crate::math::matrix::Matrix;
use crate::model::{Mode, Model};
use crate::optim::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::metrics::MetricAccumulator;
use crate::train::run_log::RunLog;

pub(crate) const RULE: &str = "------------------------";

/// Views raw scores as an `N × num_classes` matrix.
pub(crate) fn class_scores(scores: &Matrix, num_classes: usize) -> Result<Matrix> {
    scores.reshape(None, num_classes)
}

/// Runs one full pass of mini-batch SGD over the training stream.
///
/// Batches are consumed strictly in stream order and the model receives one
/// optimizer step per batch. Every `log_schedule`-th batch (starting with the
/// first) writes a progress line to the run log.
pub fn train_epoch<M, D>(
    model: &mut M,
    optimizer: &mut Sgd,
    loader: &mut DataLoader<D>,
    epoch: usize,
    num_classes: usize,
    log_schedule: usize,
    log: &RunLog,
) -> Result<EpochStats>
where
    M: Model + ?Sized,
    D: Dataset,
{
    let total = loader.dataset_len();
    let mut metrics = MetricAccumulator::new("train");

    for (b_idx, batch) in loader.batches().enumerate() {
        let batch = batch?;
        model.set_mode(Mode::Train);

        let output = model.forward(&batch.inputs)?;
        let scores = class_scores(&output.scores, num_classes)?;
        let loss = NllLoss::loss(&scores, &batch.labels)?;

        let predictions = scores.argmax_rows();
        metrics.observe(loss, &predictions, &batch.labels)?;

        model.zero_grad();
        let grad = NllLoss::derivative(&scores, &batch.labels)?;
        model.backward(&grad)?;
        optimizer.step(model.parameters());

        if b_idx % log_schedule.max(1) == 0 {
            let seen = metrics.seen();
            log.record(&format!(
                "Epoch: {} [{}/{} ({:.0}%)]\tLoss: {:.6}",
                epoch,
                seen,
                total,
                100.0 * seen as f64 / total.max(1) as f64,
                loss
            ))?;
        }
    }

    let stats = metrics.finalize(total)?;

    log.record(RULE)?;
    log.record(&format!("Average loss for epoch = {:.2}", stats.average_loss))?;
    log.record(&format!("Accuracy for epoch = {:.2}%", stats.accuracy))?;
    log.record(RULE)?;

    Ok(stats)
}
