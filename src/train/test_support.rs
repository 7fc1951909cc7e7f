//! Stub collaborators shared by the training unit tests.

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::model::{ForwardOutput, Mode, Model, Parameter, StateDict};
use crate::report::{ArtifactSink, ConfusionMatrix};

/// Sink that remembers what it was asked to persist.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub checkpoints: Vec<StateDict>,
    pub confusion_matrices: Vec<ConfusionMatrix>,
    pub loss_curves: Vec<Vec<f64>>,
    pub accuracy_curves: Vec<(Vec<f64>, Vec<f64>)>,
}

impl ArtifactSink for RecordingSink {
    fn save_checkpoint(&mut self, state: &StateDict) -> Result<()> {
        self.checkpoints.push(state.clone());
        Ok(())
    }

    fn save_confusion_matrix(&mut self, matrix: &ConfusionMatrix, _classes: &[String]) -> Result<()> {
        self.confusion_matrices.push(matrix.clone());
        Ok(())
    }

    fn save_loss_curve(&mut self, train_loss: &[f64]) -> Result<()> {
        self.loss_curves.push(train_loss.to_vec());
        Ok(())
    }

    fn save_accuracy_curves(&mut self, train_accuracy: &[f64], val_accuracy: &[f64]) -> Result<()> {
        self.accuracy_curves.push((train_accuracy.to_vec(), val_accuracy.to_vec()));
        Ok(())
    }
}

/// Parameter-free model whose validation accuracy follows a script.
///
/// During validation pass `e` (0-based) the first `correct_per_epoch[e]`
/// examples are predicted as class 0 and the rest as class 1. Training
/// passes always predict class 0. With an all-zero validation split this
/// yields exactly the scripted number of correct predictions.
pub struct ScriptedModel {
    pub correct_per_epoch: Vec<usize>,
    pub num_classes: usize,
    pub validation_passes: usize,
    pub train_forwards: usize,
    pub backward_calls: usize,
    mode: Mode,
    served: usize,
    bias: Matrix,
    bias_grad: Matrix,
}

impl ScriptedModel {
    pub fn new(correct_per_epoch: Vec<usize>, num_classes: usize) -> ScriptedModel {
        ScriptedModel {
            correct_per_epoch,
            num_classes,
            validation_passes: 0,
            train_forwards: 0,
            backward_calls: 0,
            mode: Mode::Train,
            served: 0,
            bias: Matrix::zeros(1, 1),
            bias_grad: Matrix::zeros(1, 1),
        }
    }

    /// A model that predicts class 0 for everything.
    pub fn constant(num_classes: usize) -> ScriptedModel {
        ScriptedModel::new(vec![usize::MAX; 1024], num_classes)
    }

    fn row_for(&self, class: usize) -> Vec<f64> {
        let low = (0.1 / (self.num_classes - 1) as f64).ln();
        let mut row = vec![low; self.num_classes];
        row[class] = (0.9f64).ln();
        row
    }
}

impl Model for ScriptedModel {
    fn forward(&mut self, inputs: &Matrix) -> Result<ForwardOutput> {
        let mut rows = Vec::with_capacity(inputs.rows);
        for _ in 0..inputs.rows {
            let class = match self.mode {
                Mode::Train => 0,
                Mode::Eval => {
                    let budget = self.correct_per_epoch
                        .get(self.validation_passes - 1)
                        .copied()
                        .unwrap_or(0);
                    if self.served < budget { 0 } else { 1 }
                }
            };
            self.served += 1;
            rows.push(self.row_for(class));
        }
        if self.mode == Mode::Train {
            self.train_forwards += 1;
        }
        Ok(ForwardOutput { scores: Matrix::from_data(rows), auxiliary: None })
    }

    fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Eval && self.mode == Mode::Train {
            self.validation_passes += 1;
        }
        if mode != self.mode {
            self.served = 0;
        }
        self.mode = mode;
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn zero_grad(&mut self) {
        self.bias_grad = Matrix::zeros(1, 1);
    }

    fn backward(&mut self, _grad_scores: &Matrix) -> Result<()> {
        self.backward_calls += 1;
        Ok(())
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![Parameter { name: "bias".into(), value: &mut self.bias, grad: &self.bias_grad }]
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::default();
        state.insert("validation_passes", Matrix::from_data(vec![vec![self.validation_passes as f64]]));
        state
    }

    fn load_state_dict(&mut self, _state: &StateDict, _strict: bool) -> Result<usize> {
        Ok(0)
    }
}
