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

use std::collections::HashMap;
use std::error::Error;
use std::hash::Hash;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use thiserror::Error;
use crate::corpus::CorpusDocumentStatistics;

pub mod defaults {
    use crate::tf_idf::{Idf, Tf, TfIdf};
    /// Sublinear term frequency with smoothed idf, the usual setup for short documents.
    pub const SUBLINEAR_SMOOTH: TfIdf<Tf, Idf> = TfIdf::new(Tf::Sublinear, Idf::InverseDocumentFrequencySmooth);
    pub const RAW_SMOOTH: TfIdf<Tf, Idf> = TfIdf::new(Tf::RawCount, Idf::InverseDocumentFrequencySmooth);
    pub const RAW_INVERSE: TfIdf<Tf, Idf> = TfIdf::new(Tf::RawCount, Idf::InverseDocumentFrequency);
    pub const BINARY_UNARY: TfIdf<Tf, Idf> = TfIdf::new(Tf::Binary, Idf::Unary);
}

/// A combination of Tf and Idf
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(
    serialize = "Tf: Serialize, Idf: Serialize",
    deserialize = "Tf: DeserializeOwned, Idf: DeserializeOwned"
))]
pub struct TfIdf<Tf, Idf> {
    pub tf: Tf,
    pub idf: Idf
}

impl<Tf, Idf> TfIdf<Tf, Idf> {
    pub const fn new(tf: Tf, idf: Idf) -> Self {
        Self{tf, idf}
    }
}

impl<Tf, Idf> TfIdf<Tf, Idf> where Tf: TfAlgorithm {
    delegate::delegate! {
        to self.tf {
            pub fn calculate_tf<W, D: IntoIterator<Item=W>>(&self, doc: D) -> HashMap<W, f64> where W: Hash + Eq;
        }
    }
}

impl<Tf, Idf> TfIdf<Tf, Idf> where Idf: IdfAlgorithm {
    delegate::delegate! {
        to self.idf {
            pub fn calculate_idf<S: CorpusDocumentStatistics>(&self, statistics: &S, document_frequency: u64) -> Result<f64, Idf::Error>;
        }
    }
}

impl<Tf, Idf> Copy for TfIdf<Tf, Idf> where Tf: Copy, Idf: Copy{}


/// Trait for IDF Algorithms
pub trait IdfAlgorithm {
    type Error: Error + Send + Sync + 'static;

    /// Calculates the IDF value of a term that occurs in [document_frequency] documents
    /// of the corpus described by [statistics].
    fn calculate_idf<S: CorpusDocumentStatistics>(&self, statistics: &S, document_frequency: u64) -> Result<f64, Self::Error>;
}


/// Default IDF Algorithms, `n` is the number of documents and `df` the number
/// of documents containing the term.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Idf {
    /// Always 1.0
    Unary,
    /// `ln(n / df) + 1`
    InverseDocumentFrequency,
    /// `ln((1 + n) / (1 + df)) + 1`, behaves as if every term was seen in one extra document.
    InverseDocumentFrequencySmooth,
}

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum IdfError {
    #[error("The corpus statistics do not contain a single document.")]
    StatisticsEmptyError,
    #[error("A term with a document frequency of {document_frequency} can not exist in a corpus of {document_count} documents.")]
    InvalidDocumentFrequency { document_frequency: u64, document_count: u64 }
}

impl IdfAlgorithm for Idf {
    type Error = IdfError;

    fn calculate_idf<S: CorpusDocumentStatistics>(&self, statistics: &S, document_frequency: u64) -> Result<f64, IdfError> {
        let document_count = statistics.document_count();
        if document_count == 0 {
            return Err(IdfError::StatisticsEmptyError)
        }
        if document_frequency > document_count {
            return Err(IdfError::InvalidDocumentFrequency { document_frequency, document_count })
        }
        let n = document_count as f64;
        let df = document_frequency as f64;
        match self {
            Idf::Unary => {
                Ok(1.0)
            }
            Idf::InverseDocumentFrequency => {
                if document_frequency == 0 {
                    return Err(IdfError::InvalidDocumentFrequency { document_frequency, document_count })
                }
                Ok((n / df).ln() + 1.0)
            }
            Idf::InverseDocumentFrequencySmooth => {
                Ok(((1.0 + n) / (1.0 + df)).ln() + 1.0)
            }
        }
    }
}


/// Trait for TF Algorithm
pub trait TfAlgorithm {
    /// Calculates the TF value for every distinct term in [doc].
    fn calculate_tf<W, D: IntoIterator<Item=W>>(&self, doc: D) -> HashMap<W, f64> where W: Hash + Eq;
}

/// Default TF Algorithms
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tf {
    /// 1.0 for every present term
    Binary,
    /// The number of occurrences
    RawCount,
    /// The number of occurrences divided by the length of the document
    TermFrequency,
    /// `1 + ln(count)`
    Sublinear,
}

impl Tf {
    fn raw_count<W, D: IntoIterator<Item=W>>(doc: D) -> HashMap<W, f64> where W: Hash + Eq {
        let mut result = HashMap::new();
        for word in doc {
            *result.entry(word).or_insert(0.0) += 1.0;
        }
        result
    }
}

impl TfAlgorithm for Tf {
    fn calculate_tf<W, D: IntoIterator<Item=W>>(&self, doc: D) -> HashMap<W, f64> where W: Hash + Eq {
        let mut result = Self::raw_count(doc);
        match self {
            Tf::Binary => {
                result.values_mut().for_each(|value| *value = 1.0);
            }
            Tf::RawCount => {}
            Tf::TermFrequency => {
                let divider = result.values().sum::<f64>();
                for value in result.values_mut() {
                    *value /= divider;
                }
            }
            Tf::Sublinear => {
                for value in result.values_mut() {
                    *value = value.ln() + 1.0;
                }
            }
        }
        result
    }
}

/// The normalisation applied to every vectorized document.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Norm {
    None,
    L1,
    #[default]
    L2,
}

impl Norm {
    /// Scales [values] in place, vectors without any weight are left untouched.
    pub fn apply<'a, I: IntoIterator<Item=&'a mut f64>>(&self, values: I) {
        let mut values: Vec<&'a mut f64> = values.into_iter().collect();
        let length = match self {
            Norm::None => return,
            Norm::L1 => values.iter().map(|value| value.abs()).sum::<f64>(),
            Norm::L2 => values.iter().map(|value| value.powi(2)).sum::<f64>().sqrt(),
        };
        if length > 0.0 {
            for value in values.iter_mut() {
                **value /= length;
            }
        }
    }
}
