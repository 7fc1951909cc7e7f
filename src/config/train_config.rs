use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::config::cli::Cli;
use crate::error::{Result, TrainError};
use crate::model::ModelVariant;

/// Driver activity classes, in label-index order.
pub const ACTIVITY_CLASSES: [&str; 9] = [
    "Eyes Closed",
    "Forward",
    "Shoulder",
    "Left Mirror",
    "Lap",
    "Speedometer",
    "Radio",
    "Rearview",
    "Right Mirror",
];

/// Largest accepted `--image-size`; inputs are `image_size²` features wide.
pub const MAX_IMAGE_SIZE: u32 = 1024;

/// Validated settings for one run. Written once to `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_root_path: PathBuf,
    pub version: ModelVariant,
    pub output_dir: PathBuf,
    pub snapshot: Option<PathBuf>,
    pub batch_size: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub weight_decay: f64,
    pub log_schedule: usize,
    pub seed: u64,
    pub image_size: u32,
    pub classes: Vec<String>,
    pub num_classes: usize,
}

impl TrainConfig {
    /// Checks the command line and fills in derived values.
    pub fn from_cli(cli: &Cli) -> Result<TrainConfig> {
        let dataset_root_path = cli.dataset_root_path.clone().ok_or_else(|| {
            TrainError::Configuration("path to dataset not provided (--dataset-root-path)".into())
        })?;
        let version: ModelVariant = cli.version.as_deref()
            .ok_or_else(|| TrainError::Configuration("model version not provided (--version)".into()))?
            .parse()?;
        let output_dir = cli.output_dir.clone().unwrap_or_else(default_output_dir);
        let classes: Vec<String> = ACTIVITY_CLASSES.iter().map(|c| c.to_string()).collect();

        let config = TrainConfig {
            dataset_root_path,
            version,
            output_dir,
            snapshot: cli.snapshot.clone(),
            batch_size: cli.batch_size,
            epochs: cli.epochs,
            learning_rate: cli.learning_rate,
            momentum: cli.momentum,
            weight_decay: cli.weight_decay,
            log_schedule: cli.log_schedule,
            seed: cli.seed,
            image_size: cli.image_size,
            num_classes: classes.len(),
            classes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(TrainError::Configuration(msg));

        if self.dataset_root_path.as_os_str().is_empty() {
            return fail("dataset path is empty".into());
        }
        for (name, value) in [
            ("batch size", self.batch_size),
            ("epochs", self.epochs),
            ("log schedule", self.log_schedule),
            ("image size", self.image_size as usize),
        ] {
            if value == 0 {
                return fail(format!("{name} must be at least 1"));
            }
        }
        if self.image_size > MAX_IMAGE_SIZE {
            return fail(format!(
                "image size {} exceeds the maximum of {MAX_IMAGE_SIZE}",
                self.image_size
            ));
        }
        if !self.dataset_root_path.is_dir() {
            return fail(format!(
                "dataset path {} is not a directory",
                self.dataset_root_path.display()
            ));
        }
        for (name, value) in [
            ("learning rate", self.learning_rate),
            ("momentum", self.momentum),
            ("weight decay", self.weight_decay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return fail(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if self.classes.len() < 2 || self.classes.len() != self.num_classes {
            return fail(format!(
                "expected at least two classes matching num_classes={}, got {}",
                self.num_classes,
                self.classes.len()
            ));
        }
        if let Some(snapshot) = &self.snapshot {
            if !snapshot.is_file() {
                return fail(format!("snapshot {} does not exist", snapshot.display()));
            }
        }
        Ok(())
    }

    pub fn input_size(&self) -> usize {
        let side = self.image_size as usize;
        side * side
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }
}

/// `./experiments/gazenet/<YYYY-MM-DD-HH:MM>` for the current local time.
pub fn default_output_dir() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d-%H:%M").to_string();
    Path::new(".").join("experiments").join("gazenet").join(stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["gazenet"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    /// Parses `args` on top of an existing dataset directory and version `1_1`.
    fn from_args(args: &[&str]) -> Result<TrainConfig> {
        let data = tempfile::tempdir().unwrap();
        let root = data.path().to_str().unwrap().to_string();
        let mut full = vec!["--dataset-root-path", root.as_str(), "--version", "1_1"];
        full.extend_from_slice(args);
        TrainConfig::from_cli(&cli(&full))
    }

    #[test]
    fn builds_from_minimal_cli() {
        let data = tempfile::tempdir().unwrap();
        let root = data.path().to_str().unwrap();
        let config = TrainConfig::from_cli(&cli(&["--dataset-root-path", root, "--version", "1_0"])).unwrap();
        assert_eq!(config.version, ModelVariant::V1_0);
        assert_eq!(config.num_classes, 9);
        assert_eq!(config.classes[0], "Eyes Closed");
        assert!(config.output_dir.starts_with("./experiments/gazenet"));
        assert_eq!(config.input_size(), 32 * 32);
    }

    #[test]
    fn missing_dataset_path_is_a_configuration_error() {
        let err = TrainConfig::from_cli(&cli(&["--version", "1_0"])).unwrap_err();
        assert!(matches!(err, TrainError::Configuration(_)));
    }

    #[test]
    fn nonexistent_dataset_directory_is_a_configuration_error() {
        let err = TrainConfig::from_cli(&cli(&[
            "--dataset-root-path", "/definitely/not/a/dataset", "--version", "1_1",
        ]))
        .unwrap_err();
        assert!(matches!(err, TrainError::Configuration(ref msg) if msg.contains("not a directory")));
    }

    #[test]
    fn unknown_version_is_a_configuration_error() {
        let err = TrainConfig::from_cli(&cli(&["--dataset-root-path", "d", "--version", "2_0"])).unwrap_err();
        assert!(matches!(err, TrainError::Configuration(_)));
        let err = TrainConfig::from_cli(&cli(&["--dataset-root-path", "d"])).unwrap_err();
        assert!(matches!(err, TrainError::Configuration(_)));
    }

    #[test]
    fn rejects_degenerate_hyperparameters() {
        assert!(from_args(&[]).is_ok());
        for args in [
            vec!["--batch-size", "0"],
            vec!["--epochs", "0"],
            vec!["--learning-rate=-1"],
            vec!["--snapshot", "/definitely/not/here.json"],
        ] {
            assert!(matches!(from_args(&args), Err(TrainError::Configuration(_))));
        }
    }

    #[test]
    fn oversized_images_are_rejected() {
        for size in ["70000", "1025"] {
            let err = from_args(&["--image-size", size]).unwrap_err();
            assert!(matches!(err, TrainError::Configuration(ref msg) if msg.contains("image size")));
        }
        let config = from_args(&["--image-size", "1024"]).unwrap();
        assert_eq!(config.input_size(), 1024 * 1024);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let config = from_args(&["--output-dir", "out"]).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"version\":\"1_1\""));
        let back: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, config.version);
        assert_eq!(back.batch_size, 64);
        assert_eq!(back.classes, config.classes);
        assert!((back.weight_decay - config.weight_decay).abs() < 1e-12);
    }
}
