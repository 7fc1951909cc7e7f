use std::collections::BTreeMap;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{Result, TrainError};
use crate::math::matrix::Matrix;

/// Named snapshot of every trainable tensor in a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDict {
    pub entries: BTreeMap<String, Matrix>,
}

impl StateDict {
    pub fn insert(&mut self, name: impl Into<String>, value: Matrix) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Matrix> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<StateDict> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads a snapshot previously written with `to_bytes`.
    pub fn load(path: &Path) -> Result<StateDict> {
        let bytes = std::fs::read(path)?;
        StateDict::from_bytes(&bytes)
    }

    /// Copies `source` into `target` if the shapes agree.
    pub(crate) fn copy_into(name: &str, source: &Matrix, target: &mut Matrix) -> Result<()> {
        if !source.same_shape(target) {
            return Err(TrainError::Shape(format!(
                "{}: expected {}x{}, snapshot has {}x{}",
                name, target.rows, target.cols, source.rows, source.cols
            )));
        }
        target.clone_from(source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_preserve_entries() {
        let mut sd = StateDict::default();
        sd.insert("layers.0.weight", Matrix::from_data(vec![vec![1.5, -2.0]]));
        let restored = StateDict::from_bytes(&sd.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, sd);
    }

    #[test]
    fn copy_rejects_shape_mismatch() {
        let src = Matrix::zeros(2, 2);
        let mut dst = Matrix::zeros(1, 2);
        assert!(matches!(
            StateDict::copy_into("w", &src, &mut dst),
            Err(TrainError::Shape(_))
        ));
    }
}
