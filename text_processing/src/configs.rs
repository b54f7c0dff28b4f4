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

use std::ops::Deref;
use isolang::Language;
use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use crate::stopword_registry::StopWordRepository;
use crate::tf_idf::{Idf, Norm, Tf};

/// The default pattern used to find terms in a normalized document.
/// Only terms with at least two word characters are considered.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// The config for a stopword registry
#[derive(Debug, Clone, Serialize, Deserialize, Eq)]
#[serde(transparent)]
pub struct StopwordRegistryConfig {
    pub registries: Vec<StopWordRepository>
}

impl Default for StopwordRegistryConfig {
    fn default() -> Self {
        Self {
            registries: vec![StopWordRepository::IsoDefault]
        }
    }
}

impl PartialEq for StopwordRegistryConfig {
    fn eq(&self, other: &Self) -> bool {
        self.registries.len() == other.registries.len()
            && self.registries.iter().all(|value| other.registries.contains(value))
    }
}

impl Deref for StopwordRegistryConfig {
    type Target = [StopWordRepository];

    fn deref(&self) -> &Self::Target {
        &self.registries
    }
}


/// The config for the text normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizerConfig {
    /// If set to true the text is unicode (NFC) normalized before anything else happens.
    pub normalize_text: bool,
    /// The language of the stopwords, no stopwords are removed if not set.
    pub stopword_language: Option<Language>,
    /// The snowball stemmer, nothing is stemmed if not set.
    pub stemmer: Option<Algorithm>,
    /// Where the stopwords come from.
    pub stopwords: StopwordRegistryConfig,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            normalize_text: true,
            stopword_language: Some(Language::Eng),
            stemmer: Some(Algorithm::English),
            stopwords: StopwordRegistryConfig::default(),
        }
    }
}

/// The config for the tf-idf vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorizerConfig {
    pub tf: Tf,
    pub idf: Idf,
    pub norm: Norm,
    /// Regex selecting the terms of a document.
    pub token_pattern: String,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            tf: Tf::Sublinear,
            idf: Idf::InverseDocumentFrequencySmooth,
            norm: Norm::L2,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
        }
    }
}
