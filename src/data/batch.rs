use crate::error::{Result, TrainError};
use crate::math::matrix::Matrix;

/// A group of examples processed together: `N × features` inputs and `N` labels.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: Matrix,
    pub labels: Vec<usize>,
}

impl Batch {
    pub fn new(inputs: Matrix, labels: Vec<usize>) -> Result<Batch> {
        if inputs.rows != labels.len() {
            return Err(TrainError::Shape(format!(
                "batch has {} inputs but {} labels",
                inputs.rows,
                labels.len()
            )));
        }
        if let Some((i, row)) = inputs.data.iter().enumerate().find(|(_, r)| r.len() != inputs.cols) {
            return Err(TrainError::Shape(format!(
                "batch row {} has {} features, expected {}",
                i,
                row.len(),
                inputs.cols
            )));
        }
        Ok(Batch { inputs, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
