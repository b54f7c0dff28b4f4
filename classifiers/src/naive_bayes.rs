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
use crate::classifier::{arg_max, ClassIndex, check_dimension, validate_training_set, Classifier, Convergence, Label, Trained};
use crate::error::ClassifierError;

const MIN_ALPHA: f64 = 1e-10;

/// The parameters of a [MultinomialNaiveBayes].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesParameters {
    /// Additive (Laplace/Lidstone) smoothing.
    pub alpha: f64,
}

impl Default for NaiveBayesParameters {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

/// A multinomial naive bayes model over non negative features.
/// The class priors are estimated from the training labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    classes: Vec<Label>,
    class_log_prior: Vec<f64>,
    /// One row per class with `n_features` entries.
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl MultinomialNaiveBayes {
    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// The log probability of every feature given the class at [class_idx].
    pub fn feature_log_prob(&self, class_idx: usize) -> Option<&[f64]> {
        self.feature_log_prob.get(class_idx).map(Vec::as_slice)
    }

    /// The unnormalized log posterior of every class.
    pub fn joint_log_likelihood(&self, row: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        check_dimension(self.n_features, row)?;
        Ok(
            self.class_log_prior.iter()
                .zip(self.feature_log_prob.iter())
                .map(|(prior, log_prob)| prior + row.dot(log_prob))
                .collect()
        )
    }
}

impl Classifier for MultinomialNaiveBayes {
    type Parameters = NaiveBayesParameters;

    fn fit(parameters: &NaiveBayesParameters, features: &FeatureMatrix, labels: &[Label]) -> Result<Trained<Self>, ClassifierError> {
        if !parameters.alpha.is_finite() || parameters.alpha < 0.0 {
            return Err(ClassifierError::InvalidParameter {
                name: "alpha",
                reason: format!("has to be a non negative number but is {}", parameters.alpha)
            })
        }
        let alpha = if parameters.alpha < MIN_ALPHA {
            log::warn!("alpha {} is too small, using {MIN_ALPHA} instead.", parameters.alpha);
            MIN_ALPHA
        } else {
            parameters.alpha
        };

        let ClassIndex { classes, targets } = validate_training_set(features, labels)?;
        let n_features = features.n_columns();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];
        for (row, class_idx) in features.rows().iter().zip(targets) {
            class_count[class_idx] += 1;
            let counts = &mut feature_count[class_idx];
            for FeatureEntry(column, value) in row.iter() {
                if *value < 0.0 {
                    return Err(ClassifierError::NegativeFeature { column: *column, value: *value })
                }
                counts[*column as usize] += value;
            }
        }

        let n_samples = labels.len() as f64;
        let class_log_prior = class_count.iter()
            .map(|count| (*count as f64 / n_samples).ln())
            .collect();

        let feature_log_prob = feature_count.into_iter()
            .map(|counts| {
                let denominator = (counts.iter().sum::<f64>() + alpha * n_features as f64).ln();
                counts.into_iter().map(|count| (count + alpha).ln() - denominator).collect()
            })
            .collect();

        log::debug!("Trained naive bayes on {} documents with {} classes and {n_features} features.", labels.len(), classes.len());

        Ok(Trained {
            model: Self { classes, class_log_prior, feature_log_prob, n_features },
            convergence: Convergence::Exact,
        })
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn predict_one(&self, row: &FeatureVector) -> Result<Label, ClassifierError> {
        let scores = self.joint_log_likelihood(row)?;
        Ok(self.classes[arg_max(&scores)])
    }
}
