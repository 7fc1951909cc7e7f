use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::data::{DataLoader, Dataset};
use crate::error::Result;
use crate::model::Model;
use crate::optim::Sgd;
use crate::report::ArtifactSink;
use crate::train::epoch_stats::{EpochReport, TrainingHistory};
use crate::train::loop_options::LoopOptions;
use crate::train::run_log::RunLog;
use crate::train::selector::BestModelSelector;
use crate::train::train_epoch::train_epoch;
use crate::train::validate_epoch::validate_epoch;

/// Lifecycle of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Initializing,
    EpochInProgress(usize),
    Completed,
}

/// Owns the model, optimizer, data streams and all run-wide state, and
/// drives the epoch loop: train, then validate, then persist curves.
pub struct Supervisor<M, D, S>
where
    M: Model,
    D: Dataset,
    S: ArtifactSink,
{
    pub model: M,
    pub optimizer: Sgd,
    pub train_loader: DataLoader<D>,
    pub val_loader: DataLoader<D>,
    pub sink: S,
    pub log: RunLog,
    options: LoopOptions,
    selector: BestModelSelector,
    history: TrainingHistory,
    state: SupervisorState,
}

impl<M, D, S> Supervisor<M, D, S>
where
    M: Model,
    D: Dataset,
    S: ArtifactSink,
{
    pub fn new(
        model: M,
        optimizer: Sgd,
        train_loader: DataLoader<D>,
        val_loader: DataLoader<D>,
        sink: S,
        log: RunLog,
        options: LoopOptions,
    ) -> Self {
        let selector = BestModelSelector::new(options.classes.clone());
        Supervisor {
            model,
            optimizer,
            train_loader,
            val_loader,
            sink,
            log,
            options,
            selector,
            history: TrainingHistory::default(),
            state: SupervisorState::Initializing,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    pub fn best_accuracy(&self) -> f64 {
        self.selector.best_accuracy()
    }

    fn stop_requested(&self) -> bool {
        self.options.stop_flag.as_ref().map(|f| f.load(Ordering::Relaxed)).unwrap_or(false)
    }

    /// Runs every configured epoch and returns the collected curves.
    ///
    /// Any failure inside an epoch is returned immediately; the last
    /// checkpoint written (if any) is the durable state of the run.
    pub fn run(&mut self) -> Result<TrainingHistory> {
        let num_classes = self.options.num_classes();
        let total_epochs = self.options.epochs;

        for epoch in 1..=total_epochs {
            if self.stop_requested() {
                log::info!("Stop requested, ending run before epoch {epoch}");
                break;
            }
            self.state = SupervisorState::EpochInProgress(epoch);
            let t_start = Instant::now();

            // ── Train ─────────────────────────────────────────────────────
            let train = train_epoch(
                &mut self.model,
                &mut self.optimizer,
                &mut self.train_loader,
                epoch,
                num_classes,
                self.options.log_schedule,
                &self.log,
            )?;
            self.history.train_loss.push(train.average_loss);
            self.history.train_accuracy.push(train.accuracy);
            self.sink.save_loss_curve(&self.history.train_loss)?;

            // ── Validate ──────────────────────────────────────────────────
            let outcome = validate_epoch(&mut self.model, &mut self.val_loader, num_classes, &self.log)?;
            let new_best = self.selector.consider(
                outcome.accuracy(),
                &outcome.predictions,
                &self.model,
                &mut self.sink,
            )?;
            if new_best {
                self.history.checkpoint_epochs.push(epoch);
            }
            self.history.best_accuracy = self.selector.best_accuracy();
            self.history.val_loss.push(outcome.stats.average_loss);
            self.history.val_accuracy.push(outcome.accuracy());
            self.sink.save_accuracy_curves(&self.history.train_accuracy, &self.history.val_accuracy)?;

            // ── Emit progress ─────────────────────────────────────────────
            let report = EpochReport {
                epoch,
                total_epochs,
                train,
                validation: outcome.stats,
                new_best,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            log::debug!("epoch {epoch} finished in {} ms", report.elapsed_ms);

            if let Some(ref tx) = self.options.progress_tx {
                if tx.send(report).is_err() {
                    log::info!("Progress receiver dropped, ending run after epoch {epoch}");
                    break;
                }
            }
        }

        self.state = SupervisorState::Completed;
        Ok(self.history.clone())
    }
}
