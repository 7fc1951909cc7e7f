pub mod artifacts;
pub mod confusion;
pub mod svg;

pub use artifacts::{ArtifactSink, RunDirectory};
pub use confusion::ConfusionMatrix;
