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

/// An error while loading or reshaping a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read the dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("The dataset is not valid csv: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// The content of a dataset does not fit the expected columns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("The column {0} is defined more than once!")]
    DuplicateColumn(String),
    #[error("Row {row} has {got} fields but {expected} columns are defined!")]
    FieldCount { row: usize, expected: usize, got: usize },
    #[error("The column {0} does not exist!")]
    UnknownColumn(String),
    #[error("The target {value:?} in row {row} is not an integer!")]
    InvalidTarget { row: usize, value: String },
}
