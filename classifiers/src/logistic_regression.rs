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

use serde::{Deserialize, Serialize};
use text_processing::{FeatureEntry, FeatureMatrix, FeatureVector};
use crate::classifier::{arg_max, check_dimension, validate_training_set, ClassIndex, Classifier, Convergence, Label, Trained};
use crate::error::ClassifierError;
use crate::optimize::{minimize, DifferentiableFunction, LbfgsOptions};

/// The parameters of a [LogisticRegression].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegressionParameters {
    /// Inverse of the L2 regularization strength.
    pub c: f64,
    pub max_iter: usize,
    /// The largest absolute gradient component accepted as optimal.
    pub tolerance: f64,
    /// Number of correction pairs kept by the solver.
    pub history: usize,
}

impl Default for LogisticRegressionParameters {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tolerance: 1e-4,
            history: 10,
        }
    }
}

impl LogisticRegressionParameters {
    fn validate(&self) -> Result<(), ClassifierError> {
        fn invalid(name: &'static str, reason: String) -> Result<(), ClassifierError> {
            Err(ClassifierError::InvalidParameter { name, reason })
        }
        if !self.c.is_finite() || self.c <= 0.0 {
            return invalid("c", format!("has to be a positive number but is {}", self.c))
        }
        if self.max_iter == 0 {
            return invalid("max_iter", "has to be at least 1".to_string())
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return invalid("tolerance", format!("has to be a non negative number but is {}", self.tolerance))
        }
        if self.history == 0 {
            return invalid("history", "has to be at least 1".to_string())
        }
        Ok(())
    }
}

/// A multinomial logistic regression with an L2 penalty on the weights.
/// The intercepts are not penalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    classes: Vec<Label>,
    /// One row of `n_features + 1` values per class, the last one is the intercept.
    coefficients: Vec<f64>,
    n_features: usize,
}

impl LogisticRegression {
    fn row_width(&self) -> usize {
        self.n_features + 1
    }

    /// The weights of the class at [class_idx] without the intercept.
    pub fn weights(&self, class_idx: usize) -> Option<&[f64]> {
        let start = class_idx * self.row_width();
        self.coefficients.get(start..start + self.n_features)
    }

    pub fn intercept(&self, class_idx: usize) -> Option<f64> {
        self.coefficients.get(class_idx * self.row_width() + self.n_features).copied()
    }

    pub fn decision_function(&self, row: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        check_dimension(self.n_features, row)?;
        Ok(linear_scores(&self.coefficients, self.n_features, self.classes.len(), row))
    }

    /// The probability of every class, in the order of [Classifier::classes].
    pub fn predict_proba(&self, row: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        let mut scores = self.decision_function(row)?;
        softmax(&mut scores);
        Ok(scores)
    }
}

fn linear_scores(coefficients: &[f64], n_features: usize, n_classes: usize, row: &FeatureVector) -> Vec<f64> {
    coefficients
        .chunks_exact(n_features + 1)
        .take(n_classes)
        .map(|class_row| row.dot(&class_row[..n_features]) + class_row[n_features])
        .collect()
}

/// Turns scores into probabilities in place and returns the log of the normalizer.
fn softmax(scores: &mut [f64]) -> f64 {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for score in scores.iter_mut() {
        *score = (*score - max).exp();
        sum += *score;
    }
    scores.iter_mut().for_each(|score| *score /= sum);
    max + sum.ln()
}

/// The mean cross entropy plus `||W||^2 / (2 * c * n)`.
struct CrossEntropy<'a> {
    features: &'a FeatureMatrix,
    targets: &'a [usize],
    n_classes: usize,
    c: f64,
}

impl CrossEntropy<'_> {
    fn n_features(&self) -> usize {
        self.features.n_columns()
    }
}

impl DifferentiableFunction for CrossEntropy<'_> {
    fn dimension(&self) -> usize {
        self.n_classes * (self.n_features() + 1)
    }

    fn evaluate(&self, x: &[f64], gradient: &mut [f64]) -> f64 {
        let n_features = self.n_features();
        let width = n_features + 1;
        let n_samples = self.targets.len() as f64;
        gradient.iter_mut().for_each(|value| *value = 0.0);

        let mut loss = 0.0;
        for (row, target) in self.features.rows().iter().zip(self.targets) {
            let mut scores = linear_scores(x, n_features, self.n_classes, row);
            let true_score = scores[*target];
            loss += softmax(&mut scores) - true_score;
            for (class_idx, probability) in scores.iter().enumerate() {
                let residual = if class_idx == *target { probability - 1.0 } else { *probability };
                let class_gradient = &mut gradient[class_idx * width..(class_idx + 1) * width];
                for FeatureEntry(column, value) in row.iter() {
                    class_gradient[*column as usize] += residual * value;
                }
                class_gradient[n_features] += residual;
            }
        }

        let penalty_scale = 1.0 / (self.c * n_samples);
        let mut penalty = 0.0;
        for (class_coefficients, class_gradient) in x.chunks_exact(width).zip(gradient.chunks_exact_mut(width)) {
            for (weight, grad) in class_coefficients[..n_features].iter().zip(&mut class_gradient[..n_features]) {
                penalty += weight * weight;
                *grad = *grad / n_samples + penalty_scale * weight;
            }
            class_gradient[n_features] /= n_samples;
        }

        loss / n_samples + 0.5 * penalty_scale * penalty
    }
}

impl Classifier for LogisticRegression {
    type Parameters = LogisticRegressionParameters;

    fn fit(parameters: &LogisticRegressionParameters, features: &FeatureMatrix, labels: &[Label]) -> Result<Trained<Self>, ClassifierError> {
        parameters.validate()?;
        let ClassIndex { classes, targets } = validate_training_set(features, labels)?;
        if let [single] = classes.as_slice() {
            return Err(ClassifierError::SingleClass(*single))
        }

        let objective = CrossEntropy {
            features,
            targets: &targets,
            n_classes: classes.len(),
            c: parameters.c,
        };
        let minimum = minimize(&objective, &LbfgsOptions {
            max_iter: parameters.max_iter,
            tolerance: parameters.tolerance,
            history: parameters.history,
        });

        match minimum.convergence {
            Convergence::NotConverged { iterations, gradient_norm } => {
                log::warn!(
                    "Logistic regression failed to converge after {iterations} iterations (gradient {gradient_norm:e} > {}). Increase max_iter to improve the fit.",
                    parameters.tolerance
                );
            }
            other => {
                log::debug!("Logistic regression {other}, loss {}.", minimum.value);
            }
        }

        Ok(Trained {
            model: Self { classes, coefficients: minimum.x, n_features: features.n_columns() },
            convergence: minimum.convergence,
        })
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn predict_one(&self, row: &FeatureVector) -> Result<Label, ClassifierError> {
        let scores = self.decision_function(row)?;
        Ok(self.classes[arg_max(&scores)])
    }
}


#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use text_processing::{FeatureEntry, FeatureMatrix, FeatureVector};
    use crate::classifier::{Classifier, Convergence};
    use crate::error::ClassifierError;
    use crate::optimize::DifferentiableFunction;
    use super::{CrossEntropy, LogisticRegression, LogisticRegressionParameters};

    fn row(entries: &[(u32, f64)]) -> FeatureVector {
        FeatureVector::new(3, entries.iter().map(|(c, v)| FeatureEntry(*c, *v)).collect()).unwrap()
    }

    fn separable() -> (FeatureMatrix, Vec<i64>) {
        let matrix = FeatureMatrix::new(3, vec![
            row(&[(0, 1.0)]),
            row(&[(0, 0.8), (2, 0.2)]),
            row(&[(1, 1.0)]),
            row(&[(1, 0.9), (2, 0.1)]),
            row(&[(2, 1.0)]),
            row(&[(2, 0.7), (0, 0.3)]),
        ]).unwrap();
        (matrix, vec![0, 0, 4, 4, 2, 2])
    }

    #[test]
    fn separates_a_trivial_corpus(){
        let (matrix, labels) = separable();
        let trained = LogisticRegression::fit(&LogisticRegressionParameters::default(), &matrix, &labels).unwrap();
        assert!(trained.convergence.is_converged(), "{}", trained.convergence);
        assert_eq!(&[0, 2, 4], trained.model.classes());
        assert_eq!(labels, trained.model.predict(&matrix).unwrap());

        let probabilities = trained.model.predict_proba(&row(&[(1, 1.0)])).unwrap();
        assert_approx_eq!(f64, 1.0, probabilities.iter().sum::<f64>(), epsilon = 1e-12);
        assert!(probabilities[2] > probabilities[0]);
        assert!(probabilities[2] > probabilities[1]);
    }

    #[test]
    fn running_out_of_iterations_still_gives_a_model(){
        let (matrix, labels) = separable();
        let params = LogisticRegressionParameters { max_iter: 1, ..Default::default() };
        let trained = LogisticRegression::fit(&params, &matrix, &labels).unwrap();
        assert!(matches!(trained.convergence, Convergence::NotConverged { iterations: 1, .. }));
        assert_eq!(matrix.n_rows(), trained.model.predict(&matrix).unwrap().len());
    }

    #[test]
    fn gradient_matches_finite_differences(){
        let (matrix, labels) = separable();
        let targets = labels.iter().map(|label| match label { 0 => 0, 2 => 1, _ => 2 }).collect::<Vec<usize>>();
        let objective = CrossEntropy { features: &matrix, targets: &targets, n_classes: 3, c: 0.5 };
        let x = (0..objective.dimension()).map(|idx| (idx as f64 * 0.37).sin()).collect::<Vec<_>>();
        let mut gradient = vec![0.0; x.len()];
        objective.evaluate(&x, &mut gradient);

        let h = 1e-6;
        let mut ignored = vec![0.0; x.len()];
        for idx in 0..x.len() {
            let mut upper = x.clone();
            upper[idx] += h;
            let mut lower = x.clone();
            lower[idx] -= h;
            let numeric = (objective.evaluate(&upper, &mut ignored) - objective.evaluate(&lower, &mut ignored)) / (2.0 * h);
            assert_approx_eq!(f64, numeric, gradient[idx], epsilon = 1e-6);
        }
    }

    #[test]
    fn the_intercept_is_not_penalized(){
        let (matrix, labels) = separable();
        let targets = labels.iter().map(|label| match label { 0 => 0, 2 => 1, _ => 2 }).collect::<Vec<usize>>();
        let objective = CrossEntropy { features: &matrix, targets: &targets, n_classes: 3, c: 1.0 };
        let mut zeros = vec![0.0; objective.dimension()];
        let mut gradient = vec![0.0; zeros.len()];
        let base = objective.evaluate(&zeros, &mut gradient);
        assert_approx_eq!(f64, 3.0f64.ln(), base, epsilon = 1e-12);
        // Shifting every intercept by the same amount changes nothing.
        for class_idx in 0..3 {
            zeros[class_idx * 4 + 3] = 5.0;
        }
        assert_approx_eq!(f64, base, objective.evaluate(&zeros, &mut gradient), epsilon = 1e-12);
    }

    #[test]
    fn coefficients_make_up_the_decision_function(){
        let (matrix, labels) = separable();
        let model = LogisticRegression::fit(&LogisticRegressionParameters::default(), &matrix, &labels).unwrap().model;
        let sample = row(&[(0, 0.5), (2, 0.25)]);
        let scores = model.decision_function(&sample).unwrap();
        for class_idx in 0..3 {
            let weights = model.weights(class_idx).unwrap();
            assert_eq!(3, weights.len());
            let expected = sample.dot(weights) + model.intercept(class_idx).unwrap();
            assert_approx_eq!(f64, expected, scores[class_idx], epsilon = 1e-12);
        }
        assert!(model.weights(3).is_none());
        assert!(model.intercept(3).is_none());
    }

    #[test]
    fn rejects_bad_input(){
        let (matrix, _) = separable();
        assert_eq!(
            ClassifierError::SingleClass(4),
            LogisticRegression::fit(&LogisticRegressionParameters::default(), &matrix, &[4; 6]).unwrap_err()
        );
        for params in [
            LogisticRegressionParameters { c: 0.0, ..Default::default() },
            LogisticRegressionParameters { max_iter: 0, ..Default::default() },
            LogisticRegressionParameters { history: 0, ..Default::default() },
        ] {
            assert!(matches!(
                LogisticRegression::fit(&params, &matrix, &[0, 0, 4, 4, 2, 2]),
                Err(ClassifierError::InvalidParameter { .. })
            ));
        }
        let model = LogisticRegression::fit(&LogisticRegressionParameters::default(), &matrix, &[0, 0, 4, 4, 2, 2]).unwrap().model;
        assert_eq!(
            ClassifierError::DimensionMismatch { expected: 3, got: 2 },
            model.predict_one(&FeatureVector::zeros(2)).unwrap_err()
        );
    }
}
