use crate::error::{Result, TrainError};
use crate::train::epoch_stats::EpochStats;

/// Running loss and correct-prediction totals for one pass over a split.
///
/// Per-batch losses are kept individually rather than summed so the mean
/// (and anything else) can be computed from the full sequence at the end.
#[derive(Debug, Clone)]
pub struct MetricAccumulator {
    split: String,
    losses: Vec<f64>,
    correct: usize,
    seen: usize,
}

impl MetricAccumulator {
    pub fn new(split: impl Into<String>) -> MetricAccumulator {
        MetricAccumulator {
            split: split.into(),
            losses: Vec::new(),
            correct: 0,
            seen: 0,
        }
    }

    /// Records one batch: its loss and how many predictions matched.
    pub fn observe(&mut self, loss: f64, predictions: &[usize], truth: &[usize]) -> Result<()> {
        if predictions.len() != truth.len() {
            return Err(TrainError::Shape(format!(
                "{} predictions for {} labels",
                predictions.len(),
                truth.len()
            )));
        }
        self.losses.push(loss);
        self.correct += predictions.iter().zip(truth).filter(|(p, t)| p == t).count();
        self.seen += truth.len();
        Ok(())
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Examples observed so far.
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    /// Mean loss and accuracy over `dataset_size` examples.
    ///
    /// Fails with `EmptyDataset` if nothing was observed, and with `Shape` if
    /// the number of observed examples disagrees with the split size.
    pub fn finalize(&self, dataset_size: usize) -> Result<EpochStats> {
        if dataset_size == 0 || self.losses.is_empty() {
            return Err(TrainError::empty_dataset(self.split.clone()));
        }
        if self.seen != dataset_size {
            return Err(TrainError::Shape(format!(
                "{} split: observed {} examples but the split holds {}",
                self.split, self.seen, dataset_size
            )));
        }
        let average_loss = self.losses.iter().sum::<f64>() / self.losses.len() as f64;
        let accuracy = 100.0 * self.correct as f64 / dataset_size as f64;
        Ok(EpochStats { average_loss, accuracy })
    }
}

/// Every validation prediction alongside its true label, in stream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionLog {
    pub predicted: Vec<usize>,
    pub truth: Vec<usize>,
}

impl PredictionLog {
    pub fn extend(&mut self, predicted: &[usize], truth: &[usize]) {
        self.predicted.extend_from_slice(predicted);
        self.truth.extend_from_slice(truth);
    }

    pub fn len(&self) -> usize {
        self.truth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.truth.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_loss_and_accuracy() {
        let mut acc = MetricAccumulator::new("train");
        acc.observe(0.5, &[0, 1], &[0, 0]).unwrap();
        acc.observe(1.5, &[1, 1], &[1, 1]).unwrap();
        acc.observe(1.0, &[0], &[0]).unwrap();
        let stats = acc.finalize(5).unwrap();
        assert!((stats.average_loss - 1.0).abs() < 1e-12);
        assert!((stats.accuracy - 80.0).abs() < 1e-12);
    }

    #[test]
    fn mean_is_order_independent() {
        let losses = [0.3, 2.0, 0.7, 1.1];
        let mut forward = MetricAccumulator::new("train");
        let mut backward = MetricAccumulator::new("train");
        for &l in &losses {
            forward.observe(l, &[0], &[0]).unwrap();
        }
        for &l in losses.iter().rev() {
            backward.observe(l, &[0], &[0]).unwrap();
        }
        let a = forward.finalize(4).unwrap().average_loss;
        let b = backward.finalize(4).unwrap().average_loss;
        assert!((a - b).abs() < 1e-12);
        assert!((a - 1.025).abs() < 1e-12);
    }

    #[test]
    fn empty_stream_is_an_error() {
        let acc = MetricAccumulator::new("val");
        match acc.finalize(0) {
            Err(TrainError::EmptyDataset { split }) => assert_eq!(split, "val"),
            other => panic!("expected EmptyDataset, got {other:?}"),
        }
        assert!(matches!(acc.finalize(10), Err(TrainError::EmptyDataset { .. })));
    }

    #[test]
    fn double_counting_is_detected() {
        let mut acc = MetricAccumulator::new("val");
        acc.observe(0.1, &[0, 0], &[0, 0]).unwrap();
        acc.observe(0.1, &[0, 0], &[0, 0]).unwrap();
        assert!(matches!(acc.finalize(2), Err(TrainError::Shape(_))));
    }

    #[test]
    fn mismatched_batch_is_rejected() {
        let mut acc = MetricAccumulator::new("train");
        assert!(acc.observe(0.1, &[0], &[0, 1]).is_err());
    }
}
