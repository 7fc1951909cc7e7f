pub mod cli;
pub mod train_config;

pub use cli::Cli;
pub use train_config::{TrainConfig, ACTIVITY_CLASSES};
