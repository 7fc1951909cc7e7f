use serde::{Serialize, Deserialize};

/// Aggregate result of one complete pass over a dataset split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// Arithmetic mean of the per-batch losses.
    pub average_loss: f64,
    /// Percentage of correctly classified examples, in [0, 100].
    pub accuracy: f64,
}

/// Per-epoch summary emitted by the supervisor.
///
/// When a `progress_tx` channel is configured in `LoopOptions`, one report is
/// sent at the end of every completed epoch. If the receiver has gone away the
/// run stops at that epoch boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochReport {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    pub train: EpochStats,
    pub validation: EpochStats,
    /// True when this epoch's validation accuracy set a new best and was checkpointed.
    pub new_best: bool,
    /// Wall-clock duration of the epoch (train + validation) in milliseconds.
    pub elapsed_ms: u64,
}

/// Running curves for the whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub train_loss: Vec<f64>,
    pub train_accuracy: Vec<f64>,
    pub val_loss: Vec<f64>,
    pub val_accuracy: Vec<f64>,
    pub best_accuracy: f64,
    /// Epochs (1-based) on which a checkpoint was written.
    pub checkpoint_epochs: Vec<usize>,
}

impl TrainingHistory {
    pub fn epochs_completed(&self) -> usize {
        self.val_accuracy.len()
    }
}
