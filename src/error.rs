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

use classifiers::error::{ClassifierError, EvaluationError};
use text_processing::VectorizerError;
use thiserror::Error;
use crate::dataset::DatasetError;
use crate::logging::LoggingError;

/// Everything that can stop the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Vectorizer(#[from] VectorizerError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("Failed to serialize the config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
