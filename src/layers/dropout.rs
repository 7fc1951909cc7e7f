use rand::{rngs::StdRng, Rng};

use crate::math::matrix::Matrix;

/// Inverted dropout. Only active while the model is in training mode;
/// in evaluation mode it is the identity.
#[derive(Debug, Clone)]
pub struct Dropout {
    pub rate: f64,
    mask: Option<Matrix>,
}

impl Dropout {
    pub fn new(rate: f64) -> Dropout {
        Dropout { rate, mask: None }
    }

    pub fn feed_from(&mut self, input: &Matrix, training: bool, rng: &mut StdRng) -> Matrix {
        if !training || self.rate <= 0.0 {
            self.mask = None;
            return input.clone();
        }
        let keep = 1.0 - self.rate;
        let mask = input.map(|_| if rng.gen::<f64>() < keep { 1.0 / keep } else { 0.0 });
        let out = input.hadamard(&mask);
        self.mask = Some(mask);
        out
    }

    pub fn backward(&self, output_grad: &Matrix) -> Matrix {
        match &self.mask {
            Some(mask) => output_grad.hadamard(mask),
            None => output_grad.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn eval_mode_is_identity() {
        let mut d = Dropout::new(0.5);
        let x = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]);
        let out = d.feed_from(&x, false, &mut StdRng::seed_from_u64(1));
        assert_eq!(out, x);
        assert_eq!(d.backward(&x), x);
    }

    #[test]
    fn train_mode_zeroes_or_scales() {
        let mut d = Dropout::new(0.5);
        let x = Matrix::from_data(vec![vec![1.0; 64]]);
        let out = d.feed_from(&x, true, &mut StdRng::seed_from_u64(1));
        assert!(out.data[0].iter().all(|&v| v == 0.0 || v == 2.0));
        assert!(out.data[0].iter().any(|&v| v == 0.0));
    }
}
