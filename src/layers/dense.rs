use rand::Rng;

use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

/// Fully-connected layer operating on a whole batch at once.
///
/// Weights are stored `input_size × size`, so a forward pass is
/// `activation(X · W + b)` for an `N × input_size` batch `X`.
#[derive(Debug, Clone)]
pub struct Dense {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub weights_grad: Matrix,
    pub biases_grad: Matrix,
    pub activator: ActivationFunction,
    inputs: Matrix,      // X from the last forward pass
    pre_neurons: Matrix, // z = XW + b, needed for the activation derivative
}

impl Dense {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Dense {
        let weights = if activation.prefers_he_init() {
            Matrix::he(input_size, size, rng)
        } else {
            Matrix::xavier(input_size, size, rng)
        };

        Dense {
            size,
            weights,
            biases: Matrix::zeros(1, size),
            weights_grad: Matrix::zeros(input_size, size),
            biases_grad: Matrix::zeros(1, size),
            activator: activation,
            inputs: Matrix::default(),
            pre_neurons: Matrix::default(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Forward pass; caches the input and pre-activation for `backward`.
    pub fn feed_from(&mut self, input: &Matrix) -> Matrix {
        let z = (input * &self.weights).add_row(&self.biases);
        let a = z.map(|x| self.activator.function(x));
        self.inputs = input.clone();
        self.pre_neurons = z;
        a
    }

    /// Accumulates gradients for `∂L/∂a` of this layer's output and returns
    /// `∂L/∂x` for the layer below.
    pub fn backward(&mut self, output_grad: &Matrix) -> Matrix {
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        let delta = output_grad.hadamard(&act_derivative);

        let w_grad = &self.inputs.transpose() * &delta;
        let b_grad = delta.sum_rows();
        self.weights_grad = std::mem::take(&mut self.weights_grad) + w_grad;
        self.biases_grad = std::mem::take(&mut self.biases_grad) + b_grad;

        &delta * &self.weights.transpose()
    }

    pub fn zero_grad(&mut self) {
        self.weights_grad = Matrix::zeros(self.weights.rows, self.weights.cols);
        self.biases_grad = Matrix::zeros(self.biases.rows, self.biases.cols);
    }
}
