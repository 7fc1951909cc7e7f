use std::path::Path;

use rand::{rngs::StdRng, SeedableRng};

use crate::activation::activation::ActivationFunction;
use crate::error::{Result, TrainError};
use crate::layers::{Dense, Dropout};
use crate::math::matrix::Matrix;
use crate::model::model::{ForwardOutput, Mode, Model, Parameter};
use crate::model::state_dict::StateDict;
use crate::model::variant::ModelVariant;

/// Gaze classifier: ReLU hidden stack → dropout → linear head → log-softmax.
///
/// `scores` are log-probabilities; `auxiliary` is the last hidden activation.
pub struct GazeNet {
    pub variant: ModelVariant,
    pub hidden: Vec<Dense>,
    pub dropout: Dropout,
    pub head: Dense,
    mode: Mode,
    rng: StdRng,
    log_probs: Matrix,
}

impl GazeNet {
    /// Builds a freshly initialized network. All randomness derives from `seed`.
    pub fn new(variant: ModelVariant, input_size: usize, num_classes: usize, seed: u64) -> GazeNet {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut hidden = Vec::new();
        let mut fan_in = input_size;
        for &size in variant.hidden_sizes() {
            hidden.push(Dense::new(size, fan_in, ActivationFunction::ReLU, &mut rng));
            fan_in = size;
        }
        let head = Dense::new(num_classes, fan_in, ActivationFunction::Identity, &mut rng);

        GazeNet {
            variant,
            hidden,
            dropout: Dropout::new(variant.dropout_rate()),
            head,
            mode: Mode::Train,
            rng,
            log_probs: Matrix::default(),
        }
    }

    /// Builds the network and, if given, warm-starts it from a snapshot file.
    /// Entries that don't match this architecture are skipped.
    pub fn build(
        variant: ModelVariant,
        input_size: usize,
        num_classes: usize,
        seed: u64,
        snapshot: Option<&Path>,
    ) -> Result<GazeNet> {
        let mut net = GazeNet::new(variant, input_size, num_classes, seed);
        if let Some(path) = snapshot {
            let state = StateDict::load(path)?;
            let loaded = net.load_state_dict(&state, false)?;
            log::info!(
                "Loaded {}/{} tensors from snapshot {}",
                loaded,
                net.state_dict().len(),
                path.display()
            );
        }
        Ok(net)
    }

    pub fn input_size(&self) -> usize {
        self.hidden.first().unwrap_or(&self.head).input_size()
    }

    pub fn num_classes(&self) -> usize {
        self.head.size
    }

    fn layers(&self) -> impl Iterator<Item = &Dense> {
        self.hidden.iter().chain(std::iter::once(&self.head))
    }

    fn layers_mut(&mut self) -> impl Iterator<Item = &mut Dense> {
        self.hidden.iter_mut().chain(std::iter::once(&mut self.head))
    }
}

/// Numerically stable row-wise log-softmax.
fn log_softmax(row: &[f64]) -> Vec<f64> {
    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let lse = max + row.iter().map(|x| (x - max).exp()).sum::<f64>().ln();
    row.iter().map(|x| x - lse).collect()
}

impl Model for GazeNet {
    fn forward(&mut self, inputs: &Matrix) -> Result<ForwardOutput> {
        if inputs.cols != self.input_size() {
            return Err(TrainError::Shape(format!(
                "expected {} input features, batch has {}",
                self.input_size(),
                inputs.cols
            )));
        }

        let mut current = inputs.clone();
        for layer in &mut self.hidden {
            current = layer.feed_from(&current);
        }
        let features = current;

        let training = self.mode == Mode::Train;
        let dropped = self.dropout.feed_from(&features, training, &mut self.rng);
        let logits = self.head.feed_from(&dropped);
        let scores = logits.map_rows(log_softmax);
        self.log_probs = scores.clone();

        Ok(ForwardOutput { scores, auxiliary: Some(features) })
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn zero_grad(&mut self) {
        for layer in self.layers_mut() {
            layer.zero_grad();
        }
    }

    fn backward(&mut self, grad_scores: &Matrix) -> Result<()> {
        if !grad_scores.same_shape(&self.log_probs) {
            return Err(TrainError::Shape(format!(
                "gradient is {}x{} but last forward produced {}x{}",
                grad_scores.rows, grad_scores.cols, self.log_probs.rows, self.log_probs.cols
            )));
        }

        // Through log-softmax: ∂L/∂z = g − softmax(z) · Σ g
        let grad_logits = Matrix::from_data(
            grad_scores.data.iter().zip(self.log_probs.data.iter())
                .map(|(g, lp)| {
                    let total: f64 = g.iter().sum();
                    g.iter().zip(lp.iter()).map(|(gi, l)| gi - l.exp() * total).collect()
                })
                .collect(),
        );

        let mut grad = self.head.backward(&grad_logits);
        grad = self.dropout.backward(&grad);
        for layer in self.hidden.iter_mut().rev() {
            grad = layer.backward(&grad);
        }
        Ok(())
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        let mut params = Vec::new();
        for (i, layer) in self.layers_mut().enumerate() {
            let Dense { weights, biases, weights_grad, biases_grad, .. } = layer;
            params.push(Parameter { name: format!("layers.{i}.weight"), value: weights, grad: weights_grad });
            params.push(Parameter { name: format!("layers.{i}.bias"), value: biases, grad: biases_grad });
        }
        params
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::default();
        for (i, layer) in self.layers().enumerate() {
            state.insert(format!("layers.{i}.weight"), layer.weights.clone());
            state.insert(format!("layers.{i}.bias"), layer.biases.clone());
        }
        state
    }

    fn load_state_dict(&mut self, state: &StateDict, strict: bool) -> Result<usize> {
        let mut loaded = 0;
        for param in self.parameters() {
            match state.get(&param.name) {
                Some(source) if strict => {
                    StateDict::copy_into(&param.name, source, param.value)?;
                    loaded += 1;
                }
                Some(source) => {
                    if StateDict::copy_into(&param.name, source, param.value).is_ok() {
                        loaded += 1;
                    }
                }
                None if strict => {
                    return Err(TrainError::Shape(format!("snapshot is missing {}", param.name)));
                }
                None => {}
            }
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Matrix {
        Matrix::from_data(vec![vec![0.1, 0.9, 0.3, 0.0], vec![1.0, 0.2, 0.0, 0.5]])
    }

    #[test]
    fn scores_are_log_probabilities() {
        let mut net = GazeNet::new(ModelVariant::V1_1, 4, 3, 1);
        net.set_mode(Mode::Eval);
        let out = net.forward(&batch()).unwrap();
        assert_eq!((out.scores.rows, out.scores.cols), (2, 3));
        for row in &out.scores.data {
            let total: f64 = row.iter().map(|x| x.exp()).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
        assert_eq!(out.auxiliary.unwrap().cols, 64);
    }

    #[test]
    fn eval_mode_is_deterministic() {
        let mut net = GazeNet::new(ModelVariant::V1_1, 4, 3, 1);
        net.set_mode(Mode::Eval);
        let a = net.forward(&batch()).unwrap().scores;
        let b = net.forward(&batch()).unwrap().scores;
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_wrong_feature_count() {
        let mut net = GazeNet::new(ModelVariant::V1_0, 5, 3, 1);
        assert!(matches!(net.forward(&batch()), Err(TrainError::Shape(_))));
    }

    #[test]
    fn strict_and_lenient_loading() {
        let source = GazeNet::new(ModelVariant::V1_1, 4, 3, 1);
        let mut target = GazeNet::new(ModelVariant::V1_1, 4, 3, 2);
        let n = target.load_state_dict(&source.state_dict(), true).unwrap();
        assert_eq!(n, 6);
        assert_eq!(target.state_dict(), source.state_dict());

        // Different head width: the hidden layers still transfer.
        let mut other_head = GazeNet::new(ModelVariant::V1_1, 4, 5, 3);
        let n = other_head.load_state_dict(&source.state_dict(), false).unwrap();
        assert_eq!(n, 4);
        assert!(other_head.load_state_dict(&source.state_dict(), true).is_err());
    }

    #[test]
    fn backward_fills_every_gradient() {
        let mut net = GazeNet::new(ModelVariant::V1_1, 4, 3, 1);
        net.set_mode(Mode::Eval);
        let out = net.forward(&batch()).unwrap();
        let mut grad = Matrix::zeros(out.scores.rows, out.scores.cols);
        grad.data[0][1] = -0.5;
        grad.data[1][2] = -0.5;
        net.zero_grad();
        net.backward(&grad).unwrap();
        let head_grad = &net.head.biases_grad.data[0];
        // Gradient through log-softmax sums to zero per example.
        assert!(head_grad.iter().sum::<f64>().abs() < 1e-9);
        assert!(head_grad.iter().any(|g| g.abs() > 0.0));
    }
}
