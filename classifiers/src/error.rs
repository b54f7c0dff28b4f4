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

use thiserror::Error;

/// An error while training or using a classifier.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Can not train on an empty training set!")]
    EmptyTrainingSet,
    #[error("Got {rows} rows but {labels} labels!")]
    LabelCountMismatch { rows: usize, labels: usize },
    #[error("The model was trained with {expected} features but the input has {got}!")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Feature {column} has the negative value {value}, only non negative features are supported!")]
    NegativeFeature { column: u32, value: f64 },
    #[error("Needs samples of at least two classes but the training set only contains {0}!")]
    SingleClass(i64),
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// An error while splitting a data set or scoring predictions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("The test size has to be in (0, 1) but is {0}!")]
    InvalidTestSize(f64),
    #[error("Splitting {rows} rows with a test size of {test_size} leaves one partition empty!")]
    EmptyPartition { rows: usize, test_size: f64 },
    #[error("Got {rows} rows but {labels} labels!")]
    LabelCountMismatch { rows: usize, labels: usize },
    #[error("The split indices do not fit a matrix with {0} rows!")]
    IndicesOutOfRange(usize),
    #[error("Can not score an empty set of predictions!")]
    NothingToScore,
}
