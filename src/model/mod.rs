pub mod gaze_net;
pub mod model;
pub mod state_dict;
pub mod variant;

pub use gaze_net::GazeNet;
pub use model::{ForwardOutput, Mode, Model, Parameter};
pub use state_dict::StateDict;
pub use variant::ModelVariant;
