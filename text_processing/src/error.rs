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
use crate::tf_idf::{Idf, IdfAlgorithm};

/// An error while fitting a vectorizer or building feature matrices.
#[derive(Debug, Error)]
pub enum VectorizerError<I: IdfAlgorithm = Idf> {
    #[error("Can not fit a vocabulary on an empty corpus!")]
    EmptyCorpus,
    #[error("The corpus of {0} documents does not contain a single term!")]
    EmptyVocabulary(u64),
    #[error("The row has {got} columns but the matrix has {expected}!")]
    DimensionMismatch { expected: usize, got: usize },
    #[error(transparent)]
    TokenPattern(#[from] regex::Error),
    #[error(transparent)]
    Idf(I::Error),
}
