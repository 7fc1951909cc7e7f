pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod model;
pub mod optim;
pub mod report;
pub mod session;
pub mod train;

// Convenience re-exports
pub use config::{Cli, TrainConfig};
pub use error::{Result, TrainError};
pub use math::matrix::Matrix;
pub use model::{GazeNet, Model, ModelVariant};
pub use optim::sgd::Sgd;
pub use session::run_training;
pub use train::{EpochStats, Supervisor, TrainingHistory};
