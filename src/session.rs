use crate::config::TrainConfig;
use crate::data::{DataLoader, Dataset, ImageFolderDataset};
use crate::error::{Result, TrainError};
use crate::model::GazeNet;
use crate::optim::Sgd;
use crate::report::artifacts::{CONFIG_FILE, LOG_FILE};
use crate::report::RunDirectory;
use crate::train::{LoopOptions, RunLog, Supervisor, TrainingHistory};

/// Sets up a full training run from a validated config and executes it.
///
/// Order matters: the config is validated before anything touches disk, the
/// output directory must not already exist, and both splits must be
/// non-empty before the model is built.
pub fn run_training(config: &TrainConfig) -> Result<TrainingHistory> {
    config.validate()?;

    let run_dir = RunDirectory::create(&config.output_dir)?;
    run_dir.write_json(CONFIG_FILE, config)?;
    log::info!("Writing run artifacts to {}", run_dir.root().display());

    let train_set = ImageFolderDataset::open(
        &config.dataset_root_path, "train", config.num_classes, config.image_size,
    )?;
    let val_set = ImageFolderDataset::open(
        &config.dataset_root_path, "val", config.num_classes, config.image_size,
    )?;
    for (split, ds) in [("train", &train_set), ("val", &val_set)] {
        if ds.is_empty() {
            return Err(TrainError::empty_dataset(split));
        }
    }
    log::info!("{} training / {} validation images", train_set.len(), val_set.len());

    let model = GazeNet::build(
        config.version,
        config.input_size(),
        config.num_classes,
        config.seed,
        config.snapshot_path(),
    )?;
    let optimizer = Sgd::new(config.learning_rate, config.momentum, config.weight_decay);

    let train_loader = DataLoader::new(train_set, config.batch_size, true, config.seed);
    let val_loader = DataLoader::new(val_set, config.batch_size, true, config.seed.wrapping_add(1));

    let log = RunLog::new(run_dir.path(LOG_FILE));
    let options = LoopOptions::new(config.epochs, config.classes.clone(), config.log_schedule);

    let mut supervisor = Supervisor::new(model, optimizer, train_loader, val_loader, run_dir, log, options);
    let history = supervisor.run()?;

    log::info!(
        "Finished {} epochs, best validation accuracy {:.2}%",
        history.epochs_completed(),
        history.best_accuracy
    );
    Ok(history)
}
