//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.

use std::fmt::{Display, Formatter};
use itertools::Itertools;
use text_processing::{FeatureMatrix, FeatureVector};
use crate::error::ClassifierError;

/// The class label of a document.
pub type Label = i64;

/// How the training of a model ended.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Convergence {
    /// The model has a closed form solution.
    Exact,
    /// The solver reached the tolerance.
    Converged { iterations: usize },
    /// The solver stopped before reaching the tolerance.
    /// The model is still usable.
    NotConverged { iterations: usize, gradient_norm: f64 },
}

impl Convergence {
    pub fn is_converged(&self) -> bool {
        !matches!(self, Convergence::NotConverged { .. })
    }
}

impl Display for Convergence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Convergence::Exact => write!(f, "exact"),
            Convergence::Converged { iterations } => write!(f, "converged after {iterations} iterations"),
            Convergence::NotConverged { iterations, gradient_norm } => {
                write!(f, "not converged after {iterations} iterations (gradient norm {gradient_norm:e})")
            }
        }
    }
}

/// A trained model with the information how the training ended.
#[derive(Debug, Clone)]
pub struct Trained<M> {
    pub model: M,
    pub convergence: Convergence,
}

/// A classifier working on sparse feature vectors.
pub trait Classifier: Sized {
    type Parameters;

    /// Trains a new model on [features] with one label per row.
    fn fit(parameters: &Self::Parameters, features: &FeatureMatrix, labels: &[Label]) -> Result<Trained<Self>, ClassifierError>;

    /// The number of features the model was trained with.
    fn n_features(&self) -> usize;

    /// The known labels, sorted ascending.
    fn classes(&self) -> &[Label];

    /// Predicts the label of a single row.
    fn predict_one(&self, row: &FeatureVector) -> Result<Label, ClassifierError>;

    /// Predicts the label of every row in [features].
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, ClassifierError> {
        features.rows().iter().map(|row| self.predict_one(row)).collect()
    }
}

/// The labels of a training set mapped to class indices.
pub(crate) struct ClassIndex {
    /// The distinct labels, sorted ascending.
    pub classes: Vec<Label>,
    /// The index in `classes` for every row.
    pub targets: Vec<usize>,
}

/// Checks the shape of a training set and indexes its labels.
pub(crate) fn validate_training_set(features: &FeatureMatrix, labels: &[Label]) -> Result<ClassIndex, ClassifierError> {
    if features.n_rows() != labels.len() {
        return Err(ClassifierError::LabelCountMismatch { rows: features.n_rows(), labels: labels.len() })
    }
    if features.is_empty() {
        return Err(ClassifierError::EmptyTrainingSet)
    }
    let classes = labels.iter().copied().sorted().dedup().collect_vec();
    let targets = labels.iter()
        .map(|label| classes.partition_point(|known| known < label))
        .collect();
    Ok(ClassIndex { classes, targets })
}

pub(crate) fn check_dimension(expected: usize, row: &FeatureVector) -> Result<(), ClassifierError> {
    if row.dimension() != expected {
        Err(ClassifierError::DimensionMismatch { expected, got: row.dimension() })
    } else {
        Ok(())
    }
}

/// Index of the largest score, the first one wins on ties.
pub(crate) fn arg_max(scores: &[f64]) -> usize {
    let mut best = 0;
    for (idx, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod test {
    use super::{arg_max, Convergence};

    #[test]
    fn arg_max_prefers_the_first(){
        assert_eq!(1, arg_max(&[0.1, 0.5, 0.5]));
        assert_eq!(0, arg_max(&[2.0]));
    }

    #[test]
    fn convergence(){
        assert!(Convergence::Exact.is_converged());
        assert!(Convergence::Converged { iterations: 3 }.is_converged());
        let failed = Convergence::NotConverged { iterations: 100, gradient_norm: 0.1 };
        assert!(!failed.is_converged());
        assert!(failed.to_string().starts_with("not converged after 100 iterations"));
    }
}
