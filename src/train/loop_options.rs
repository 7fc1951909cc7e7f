use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::train::epoch_stats::EpochReport;

/// Settings for a `Supervisor` run.
///
/// # Fields
/// - `epochs`      : total number of train/validate cycles
/// - `classes`     : class names; their count is the width of the score matrix
/// - `log_schedule`: a training step line is logged every `log_schedule` batches
/// - `progress_tx` : optional channel; one `EpochReport` per completed epoch.
///                    If the receiver is dropped the run stops at the next
///                    epoch boundary.
/// - `stop_flag`   : optional atomic flag checked before each epoch starts
pub struct LoopOptions {
    pub epochs: usize,
    pub classes: Vec<String>,
    pub log_schedule: usize,
    pub progress_tx: Option<mpsc::Sender<EpochReport>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl LoopOptions {
    /// Creates options with no progress channel and no stop flag.
    pub fn new(epochs: usize, classes: Vec<String>, log_schedule: usize) -> Self {
        LoopOptions {
            epochs,
            classes,
            log_schedule: log_schedule.max(1),
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }
}
