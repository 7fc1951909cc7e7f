pub mod epoch_stats;
pub mod loop_options;
pub mod metrics;
pub mod run_log;
pub mod selector;
pub mod supervisor;
pub mod train_epoch;
pub mod validate_epoch;

#[cfg(test)]
pub(crate) mod test_support;

pub use epoch_stats::{EpochReport, EpochStats, TrainingHistory};
pub use loop_options::LoopOptions;
pub use metrics::{MetricAccumulator, PredictionLog};
pub use run_log::RunLog;
pub use selector::BestModelSelector;
pub use supervisor::{Supervisor, SupervisorState};
pub use train_epoch::train_epoch;
pub use validate_epoch::{validate_epoch, ValidationOutcome};
