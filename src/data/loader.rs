use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::batch::Batch;
use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::math::matrix::Matrix;

/// Streams fixed-size batches over a dataset, one epoch per `batches()` call.
///
/// With `shuffle`, example order is permuted by the loader's own seeded RNG,
/// so a fixed seed reproduces the same sequence of epochs. The final batch
/// of an epoch may be short.
pub struct DataLoader<D: Dataset> {
    pub dataset: D,
    pub batch_size: usize,
    pub shuffle: bool,
    rng: StdRng,
}

impl<D: Dataset> DataLoader<D> {
    pub fn new(dataset: D, batch_size: usize, shuffle: bool, seed: u64) -> DataLoader<D> {
        DataLoader {
            dataset,
            batch_size: batch_size.max(1),
            shuffle,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Total number of examples in the underlying split.
    pub fn dataset_len(&self) -> usize {
        self.dataset.len()
    }

    pub fn num_batches(&self) -> usize {
        (self.dataset_len() + self.batch_size - 1) / self.batch_size
    }

    /// Starts a new epoch.
    pub fn batches(&mut self) -> Batches<'_, D> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            order.shuffle(&mut self.rng);
        }
        Batches {
            dataset: &self.dataset,
            order,
            batch_size: self.batch_size,
            cursor: 0,
        }
    }
}

/// Iterator over one epoch's batches. Examples are fetched lazily.
pub struct Batches<'a, D: Dataset> {
    dataset: &'a D,
    order: Vec<usize>,
    batch_size: usize,
    cursor: usize,
}

impl<D: Dataset> Iterator for Batches<'_, D> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let end = (self.cursor + self.batch_size).min(self.order.len());
        let indices = &self.order[self.cursor..end];
        self.cursor = end;

        let mut rows = Vec::with_capacity(indices.len());
        let mut labels = Vec::with_capacity(indices.len());
        for &idx in indices {
            match self.dataset.get(idx) {
                Ok((x, y)) => {
                    rows.push(x);
                    labels.push(y);
                }
                Err(e) => return Some(Err(e)),
            }
        }
        Some(Batch::new(Matrix::from_data(rows), labels))
    }
}
