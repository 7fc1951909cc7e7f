use std::path::PathBuf;

/// Errors raised while configuring or running a training job.
#[derive(thiserror::Error, Debug)]
pub enum TrainError {
    /// A required setting is missing or unsupported. Raised before training starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A dataset split produced no examples, so mean loss and accuracy are undefined.
    #[error("the {split} split contains no examples")]
    EmptyDataset { split: String },

    /// The artifact destination already exists.
    #[error("output directory already exists: {}", .0.display())]
    OutputConflict(PathBuf),

    /// Tensor shapes do not line up (malformed batch, scores, or state dict).
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// The dataset on disk could not be interpreted.
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl TrainError {
    pub fn empty_dataset(split: impl Into<String>) -> Self {
        TrainError::EmptyDataset { split: split.into() }
    }
}

pub type Result<T> = std::result::Result<T, TrainError>;
