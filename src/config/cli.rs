use std::path::PathBuf;

use clap::Parser;

/// Command-line options for a training run.
#[derive(Parser, Debug, Clone)]
#[command(name = "gazenet", about = "Train the driver gaze/activity classifier")]
pub struct Cli {
    /// Path to the dataset root (expects train/ and val/ subdirectories)
    #[arg(long)]
    pub dataset_root_path: Option<PathBuf>,

    /// Which model variant to build (1_0 or 1_1)
    #[arg(long)]
    pub version: Option<String>,

    /// Output directory for the model, logs and plots
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Path to a pre-trained model snapshot
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Batch size for training
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Number of epochs to train for
    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    #[arg(long, default_value_t = 0.0005)]
    pub learning_rate: f64,

    /// Momentum for the gradient step
    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,

    #[arg(long, default_value_t = 0.0005)]
    pub weight_decay: f64,

    /// Number of iterations between training log lines
    #[arg(long, default_value_t = 10)]
    pub log_schedule: usize,

    /// Seed for weight init, dropout and shuffling
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Side length images are resized to before flattening
    #[arg(long, default_value_t = 32)]
    pub image_size: u32,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}
