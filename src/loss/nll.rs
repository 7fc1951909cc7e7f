use crate::error::{Result, TrainError};
use crate::math::matrix::Matrix;

/// Negative log-likelihood over log-probability scores.
///
/// Paired with a log-softmax output this is standard multi-class
/// cross-entropy: `L = −mean_i scores[i, target_i]`.
pub struct NllLoss;

impl NllLoss {
    fn check(scores: &Matrix, targets: &[usize]) -> Result<()> {
        if scores.rows != targets.len() {
            return Err(TrainError::Shape(format!(
                "{} score rows for {} targets", scores.rows, targets.len()
            )));
        }
        if scores.rows == 0 {
            return Err(TrainError::Shape("empty batch".into()));
        }
        if let Some(&bad) = targets.iter().find(|&&t| t >= scores.cols) {
            return Err(TrainError::Shape(format!(
                "target class {} out of range for {} classes", bad, scores.cols
            )));
        }
        Ok(())
    }

    /// Scalar batch-mean loss.
    pub fn loss(scores: &Matrix, targets: &[usize]) -> Result<f64> {
        Self::check(scores, targets)?;
        let total: f64 = scores.data.iter().zip(targets)
            .map(|(row, &t)| -row[t])
            .sum();
        Ok(total / targets.len() as f64)
    }

    /// `∂L/∂scores`: `−1/N` at each target position, zero elsewhere.
    pub fn derivative(scores: &Matrix, targets: &[usize]) -> Result<Matrix> {
        Self::check(scores, targets)?;
        let scale = -1.0 / targets.len() as f64;
        let mut grad = Matrix::zeros(scores.rows, scores.cols);
        for (row, &t) in grad.data.iter_mut().zip(targets) {
            row[t] = scale;
        }
        Ok(grad)
    }
}
