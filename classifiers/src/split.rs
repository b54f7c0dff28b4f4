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

use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use text_processing::FeatureMatrix;
use crate::classifier::Label;
use crate::error::EvaluationError;

/// How a data set is divided into a train and a test partition.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitParameters {
    /// The share of rows used for testing, in (0, 1).
    pub test_size: f64,
    pub seed: u64,
}

impl Default for SplitParameters {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 30
        }
    }
}

/// The row indices of both partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitIndices {
    /// Shuffles `0..rows` with a seeded rng, the first `ceil(test_size * rows)` indices
    /// are the test partition.
    pub fn shuffled(rows: usize, parameters: &SplitParameters) -> Result<Self, EvaluationError> {
        let test_size = parameters.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(EvaluationError::InvalidTestSize(test_size))
        }
        let n_test = (test_size * rows as f64).ceil() as usize;
        if n_test == 0 || n_test >= rows {
            return Err(EvaluationError::EmptyPartition { rows, test_size })
        }
        let mut indices = (0..rows).collect::<Vec<_>>();
        indices.shuffle(&mut StdRng::seed_from_u64(parameters.seed));
        let train = indices.split_off(n_test);
        Ok(Self { train, test: indices })
    }
}

/// A feature matrix with its labels divided into train and test partitions.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: FeatureMatrix,
    pub x_test: FeatureMatrix,
    pub y_train: Vec<Label>,
    pub y_test: Vec<Label>,
}

fn pick(labels: &[Label], indices: &[usize]) -> Vec<Label> {
    indices.iter().map(|idx| labels[*idx]).collect()
}

/// Splits [features] and [labels] with the same shuffled indices.
pub fn train_test_split(features: &FeatureMatrix, labels: &[Label], parameters: &SplitParameters) -> Result<TrainTestSplit, EvaluationError> {
    if features.n_rows() != labels.len() {
        return Err(EvaluationError::LabelCountMismatch { rows: features.n_rows(), labels: labels.len() })
    }
    let SplitIndices { train, test } = SplitIndices::shuffled(labels.len(), parameters)?;
    let select = |indices: &[usize]| {
        features.select(indices).ok_or(EvaluationError::IndicesOutOfRange(features.n_rows()))
    };
    Ok(TrainTestSplit {
        x_train: select(&train)?,
        x_test: select(&test)?,
        y_train: pick(labels, &train),
        y_test: pick(labels, &test),
    })
}
