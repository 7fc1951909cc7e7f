use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::TrainError;

/// Named architecture variants accepted on the command line.
///
/// - `V1_0`: two hidden ReLU layers of 256 and 128 units
/// - `V1_1`: a lighter stack of 128 and 64 units
///
/// Both apply dropout before the classification head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    #[serde(rename = "1_0")]
    V1_0,
    #[serde(rename = "1_1")]
    V1_1,
}

impl ModelVariant {
    pub fn hidden_sizes(&self) -> &'static [usize] {
        match self {
            ModelVariant::V1_0 => &[256, 128],
            ModelVariant::V1_1 => &[128, 64],
        }
    }

    pub fn dropout_rate(&self) -> f64 {
        0.5
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::V1_0 => "1_0",
            ModelVariant::V1_1 => "1_1",
        }
    }
}

impl FromStr for ModelVariant {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1_0" => Ok(ModelVariant::V1_0),
            "1_1" => Ok(ModelVariant::V1_1),
            other => Err(TrainError::Configuration(format!(
                "model version not recognized: {other:?} (expected 1_0 or 1_1)"
            ))),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
