use crate::error::{Result, TrainError};

/// Random-access collection of labeled examples.
pub trait Dataset {
    fn len(&self) -> usize;

    /// Returns the flattened feature vector and class index of one example.
    fn get(&self, index: usize) -> Result<(Vec<f64>, usize)>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Examples held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    pub inputs: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
}

impl InMemoryDataset {
    pub fn new(inputs: Vec<Vec<f64>>, labels: Vec<usize>) -> Result<InMemoryDataset> {
        if inputs.len() != labels.len() {
            return Err(TrainError::Dataset(format!(
                "{} inputs but {} labels",
                inputs.len(),
                labels.len()
            )));
        }
        if let Some(width) = inputs.first().map(|r| r.len()) {
            if let Some(i) = inputs.iter().position(|r| r.len() != width) {
                return Err(TrainError::Shape(format!(
                    "example {} has {} features, expected {}",
                    i,
                    inputs[i].len(),
                    width
                )));
            }
        }
        Ok(InMemoryDataset { inputs, labels })
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.inputs.len()
    }

    fn get(&self, index: usize) -> Result<(Vec<f64>, usize)> {
        match (self.inputs.get(index), self.labels.get(index)) {
            (Some(x), Some(&y)) => Ok((x.clone(), y)),
            _ => Err(TrainError::Dataset(format!(
                "index {} out of range for {} examples",
                index,
                self.inputs.len()
            ))),
        }
    }
}

impl<D: Dataset + ?Sized> Dataset for Box<D> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Result<(Vec<f64>, usize)> {
        (**self).get(index)
    }
}
