use crate::math::matrix::Matrix;
use crate::model::Parameter;

/// Stochastic gradient descent with momentum and L2 weight decay.
///
/// Per parameter `p` with gradient `g`:
///   d = g + weight_decay · p
///   v = d                      (first step)
///   v = momentum · v + d       (afterwards)
///   p = p − learning_rate · v
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
    pub weight_decay: f64,
    velocity: Vec<Option<Matrix>>,
}

impl Sgd {
    pub fn new(learning_rate: f64, momentum: f64, weight_decay: f64) -> Sgd {
        Sgd { learning_rate, momentum, weight_decay, velocity: Vec::new() }
    }

    /// Applies one update to every parameter. Velocity buffers are keyed on
    /// the parameter's position, so the model must list them in a stable order.
    pub fn step(&mut self, params: Vec<Parameter<'_>>) {
        if self.velocity.len() < params.len() {
            self.velocity.resize(params.len(), None);
        }

        for (slot, param) in self.velocity.iter_mut().zip(params) {
            let wd = self.weight_decay;
            let mut d = param.grad.clone();
            if wd != 0.0 {
                d = d + param.value.map(|x| x * wd);
            }

            if self.momentum != 0.0 {
                let momentum = self.momentum;
                let v = match slot.take() {
                    Some(prev) if prev.same_shape(&d) => prev.map(|x| x * momentum) + d,
                    _ => d,
                };
                d = v.clone();
                *slot = Some(v);
            }

            let lr = self.learning_rate;
            let updated = std::mem::take(&mut *param.value) - d.map(|x| x * lr);
            *param.value = updated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(value: &'a mut Matrix, grad: &'a Matrix) -> Parameter<'a> {
        Parameter { name: "p".into(), value, grad }
    }

    #[test]
    fn plain_step() {
        let mut sgd = Sgd::new(0.1, 0.0, 0.0);
        let mut w = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let g = Matrix::from_data(vec![vec![1.0, -1.0]]);
        sgd.step(vec![param(&mut w, &g)]);
        assert!((w.data[0][0] - 0.9).abs() < 1e-12);
        assert!((w.data[0][1] - 2.1).abs() < 1e-12);
    }

    #[test]
    fn momentum_accumulates_velocity() {
        let mut sgd = Sgd::new(1.0, 0.5, 0.0);
        let mut w = Matrix::from_data(vec![vec![0.0]]);
        let g = Matrix::from_data(vec![vec![1.0]]);
        sgd.step(vec![param(&mut w, &g)]);
        assert_eq!(w.data, vec![vec![-1.0]]);
        sgd.step(vec![param(&mut w, &g)]);
        // v = 0.5 * 1 + 1 = 1.5
        assert_eq!(w.data, vec![vec![-2.5]]);
    }

    #[test]
    fn weight_decay_pulls_towards_zero() {
        let mut sgd = Sgd::new(0.5, 0.0, 0.1);
        let mut w = Matrix::from_data(vec![vec![2.0]]);
        let g = Matrix::zeros(1, 1);
        sgd.step(vec![param(&mut w, &g)]);
        assert!((w.data[0][0] - 1.9).abs() < 1e-12);
    }
}
