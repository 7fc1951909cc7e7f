pub mod batch;
pub mod dataset;
pub mod image_folder;
pub mod loader;

pub use batch::Batch;
pub use dataset::{Dataset, InMemoryDataset};
pub use image_folder::ImageFolderDataset;
pub use loader::{Batches, DataLoader};
