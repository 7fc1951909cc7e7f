use crate::error::{Result, TrainError};

/// Counts of true class (row) against predicted class (column).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_predictions(predicted: &[usize], truth: &[usize], num_classes: usize) -> Result<ConfusionMatrix> {
        if predicted.len() != truth.len() {
            return Err(TrainError::Shape(format!(
                "{} predictions for {} labels",
                predicted.len(),
                truth.len()
            )));
        }
        let mut counts = vec![vec![0usize; num_classes]; num_classes];
        for (&p, &t) in predicted.iter().zip(truth) {
            if p >= num_classes || t >= num_classes {
                return Err(TrainError::Shape(format!(
                    "class pair ({t}, {p}) out of range for {num_classes} classes"
                )));
            }
            counts[t][p] += 1;
        }
        Ok(ConfusionMatrix { counts })
    }

    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }

    /// Each row divided by its sum, i.e. the per-class recall distribution.
    /// A class with no true examples gets an all-zero row.
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        self.counts.iter()
            .map(|row| {
                let total: usize = row.iter().sum();
                if total == 0 {
                    vec![0.0; row.len()]
                } else {
                    row.iter().map(|&c| c as f64 / total as f64).collect()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_predictor_fills_first_column() {
        let truth = [0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        let predicted = [0; 10];
        let cm = ConfusionMatrix::from_predictions(&predicted, &truth, 2).unwrap();
        assert_eq!(cm.counts, vec![vec![5, 0], vec![5, 0]]);
        assert_eq!(cm.normalized(), vec![vec![1.0, 0.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn rows_sum_to_one_and_empty_rows_stay_zero() {
        let truth = [0, 0, 0, 2, 2];
        let predicted = [0, 1, 2, 2, 0];
        let norm = ConfusionMatrix::from_predictions(&predicted, &truth, 3).unwrap().normalized();
        for r in [0, 2] {
            assert!((norm[r].iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        assert_eq!(norm[1], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn out_of_range_labels_are_rejected() {
        assert!(ConfusionMatrix::from_predictions(&[3], &[0], 2).is_err());
        assert!(ConfusionMatrix::from_predictions(&[0, 1], &[0], 2).is_err());
    }
}
