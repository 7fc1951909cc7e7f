use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::model::state_dict::StateDict;

/// Train/eval switch. Evaluation mode disables training-only regularization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Eval,
}

/// Result of one forward pass.
#[derive(Debug, Clone)]
pub struct ForwardOutput {
    /// Per-class log-probabilities, `N × C` (or a view reshapeable to it).
    pub scores: Matrix,
    /// Model-specific side output, e.g. the feature map that fed the head.
    pub auxiliary: Option<Matrix>,
}

/// A trainable tensor paired with its accumulated gradient.
pub struct Parameter<'a> {
    pub name: String,
    pub value: &'a mut Matrix,
    pub grad: &'a Matrix,
}

/// Capability set the training loop needs from a classifier.
pub trait Model {
    fn forward(&mut self, inputs: &Matrix) -> Result<ForwardOutput>;

    fn set_mode(&mut self, mode: Mode);

    fn mode(&self) -> Mode;

    /// Clears every accumulated parameter gradient.
    fn zero_grad(&mut self);

    /// Backpropagates `∂L/∂scores` through the most recent forward pass,
    /// adding into the parameter gradients.
    fn backward(&mut self, grad_scores: &Matrix) -> Result<()>;

    /// Parameters in a stable order. Optimizers key their state on position.
    fn parameters(&mut self) -> Vec<Parameter<'_>>;

    fn state_dict(&self) -> StateDict;

    /// Loads matching entries and returns how many were copied.
    /// With `strict`, any missing or mismatched entry is an error.
    fn load_state_dict(&mut self, state: &StateDict, strict: bool) -> Result<usize>;
}
