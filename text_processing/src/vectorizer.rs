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
use std::fmt::Debug;
use std::ops::Deref;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::configs::VectorizerConfig;
use crate::corpus::{CorpusDocumentStatistics, CorpusStatisticsCollector};
use crate::error::VectorizerError;
use crate::tf_idf::{Idf, IdfAlgorithm, Norm, Tf, TfAlgorithm, TfIdf};


/// A non-zero entry in a feature vector, the column and the weight.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry(pub u32, pub f64);

/// A sparse row of a feature matrix. The entries are sorted by their column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<FeatureEntry>,
}

impl FeatureVector {
    /// Creates a vector from arbitrary entries, they are sorted and entries
    /// outside of the [dimension] are rejected.
    pub fn new(dimension: usize, mut entries: Vec<FeatureEntry>) -> Result<Self, VectorizerError> {
        if let Some(FeatureEntry(column, _)) = entries.iter().find(|value| value.0 as usize >= dimension) {
            return Err(VectorizerError::DimensionMismatch { expected: dimension, got: *column as usize + 1 })
        }
        entries.sort_by_key(|value| value.0);
        entries.shrink_to_fit();
        Ok(Self { dimension, entries })
    }

    /// An empty vector, every weight is zero.
    pub fn zeros(dimension: usize) -> Self {
        Self { dimension, entries: Vec::new() }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of non zero entries.
    pub fn non_zero(&self) -> usize {
        self.entries.len()
    }

    /// The weight of [column], zero if not set.
    pub fn get(&self, column: u32) -> f64 {
        self.entries
            .binary_search_by_key(&column, |value| value.0)
            .map(|idx| self.entries[idx].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense vector of the same dimension.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        debug_assert_eq!(self.dimension, dense.len());
        self.entries.iter().map(|FeatureEntry(column, value)| dense[*column as usize] * value).sum()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut result = vec![0.0; self.dimension];
        for FeatureEntry(column, value) in &self.entries {
            result[*column as usize] = *value;
        }
        result
    }
}

impl Deref for FeatureVector {
    type Target = [FeatureEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}


/// A sparse matrix made of feature vectors that share one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    columns: usize,
    rows: Vec<FeatureVector>,
}

impl FeatureMatrix {
    pub fn new(columns: usize, rows: Vec<FeatureVector>) -> Result<Self, VectorizerError> {
        if let Some(row) = rows.iter().find(|row| row.dimension() != columns) {
            return Err(VectorizerError::DimensionMismatch { expected: columns, got: row.dimension() })
        }
        Ok(Self { columns, rows })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<&FeatureVector> {
        self.rows.get(idx)
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    /// Copies the rows at [indices] into a new matrix, in the given order.
    pub fn select(&self, indices: &[usize]) -> Option<Self> {
        let rows = indices.iter().map(|idx| self.rows.get(*idx).cloned()).collect::<Option<Vec<_>>>()?;
        Some(Self { columns: self.columns, rows })
    }
}


/// Something with a fixed number of features.
pub trait FeatureSpace {
    fn dimension(&self) -> usize;
}

/// Turns documents into feature vectors.
///
/// Fitting produces a vocabulary, every later transformation reuses it.
/// There is no way to refit a vocabulary, a new one has to be fitted explicitly.
pub trait Vectorizer {
    type Vocabulary: FeatureSpace;
    type Error: std::error::Error;

    /// Learns the vocabulary of [corpus].
    fn fit<I, T>(&self, corpus: I) -> Result<Self::Vocabulary, Self::Error>
    where
        I: IntoIterator<Item=T>,
        T: AsRef<str>;

    /// Transforms a single document with a fitted [vocabulary].
    fn transform(&self, document: &str, vocabulary: &Self::Vocabulary) -> FeatureVector;

    /// Transforms every document of [corpus] into one row of a matrix.
    fn transform_corpus<I, T>(&self, corpus: I, vocabulary: &Self::Vocabulary) -> FeatureMatrix
    where
        I: IntoIterator<Item=T>,
        T: AsRef<str>
    {
        FeatureMatrix {
            columns: vocabulary.dimension(),
            rows: corpus.into_iter().map(|document| self.transform(document.as_ref(), vocabulary)).collect(),
        }
    }
}


/// The fitted terms of a corpus with their column and idf weight.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<(String, f64)>,
    columns: HashMap<String, u32>,
}

impl Vocabulary {
    fn from_sorted(terms: Vec<(String, f64)>) -> Self {
        let columns = terms
            .iter()
            .enumerate()
            .map(|(idx, (term, _))| (term.clone(), idx as u32))
            .collect();
        Self { terms, columns }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The column of [term].
    pub fn column(&self, term: &str) -> Option<u32> {
        self.columns.get(term).copied()
    }

    /// The idf weight of [term].
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.column(term).map(|column| self.terms[column as usize].1)
    }

    /// The terms in column order.
    pub fn terms(&self) -> impl Iterator<Item=&str> {
        self.terms.iter().map(|(term, _)| term.as_str())
    }
}

impl FeatureSpace for Vocabulary {
    fn dimension(&self) -> usize {
        self.len()
    }
}


/// A tf-idf vectorizer.
///
/// Terms are found with the token pattern, the columns are ordered lexicographically by term.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer<T = Tf, I = Idf> {
    tf_idf: TfIdf<T, I>,
    norm: Norm,
    token_pattern: Regex,
}

impl<T, I> TfIdfVectorizer<T, I> {
    pub fn new(tf_idf: TfIdf<T, I>, norm: Norm, token_pattern: &str) -> Result<Self, VectorizerError<I>> where I: IdfAlgorithm {
        Ok(Self { tf_idf, norm, token_pattern: Regex::new(token_pattern)? })
    }

    pub fn tf_idf(&self) -> &TfIdf<T, I> {
        &self.tf_idf
    }

    /// The terms of [document] as found by the token pattern.
    pub fn analyze<'s, 'a: 's>(&'s self, document: &'a str) -> impl Iterator<Item=&'a str> + 's {
        self.token_pattern.find_iter(document).map(|value| value.as_str())
    }
}

impl TfIdfVectorizer<Tf, Idf> {
    pub fn from_config(cfg: &VectorizerConfig) -> Result<Self, VectorizerError> {
        Self::new(TfIdf::new(cfg.tf, cfg.idf), cfg.norm, &cfg.token_pattern)
    }
}

impl<T, I> Vectorizer for TfIdfVectorizer<T, I> where T: TfAlgorithm, I: IdfAlgorithm + Debug {
    type Vocabulary = Vocabulary;
    type Error = VectorizerError<I>;

    fn fit<C, D>(&self, corpus: C) -> Result<Vocabulary, VectorizerError<I>>
    where
        C: IntoIterator<Item=D>,
        D: AsRef<str>
    {
        let mut statistics = CorpusStatisticsCollector::default();
        for document in corpus {
            statistics.add(self.analyze(document.as_ref()).map(str::to_string));
        }
        if statistics.document_count() == 0 {
            return Err(VectorizerError::EmptyCorpus)
        }
        if statistics.unique_word_count() == 0 {
            return Err(VectorizerError::EmptyVocabulary(statistics.document_count()))
        }
        let terms = statistics
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(term, document_frequency)| {
                self.tf_idf
                    .calculate_idf(&statistics, *document_frequency)
                    .map(|idf| (term.clone(), idf))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(VectorizerError::Idf)?;
        log::debug!(
            "Fitted a vocabulary of {} terms on {} documents with {} tokens.",
            terms.len(),
            statistics.document_count(),
            statistics.token_count()
        );
        Ok(Vocabulary::from_sorted(terms))
    }

    fn transform(&self, document: &str, vocabulary: &Vocabulary) -> FeatureVector {
        let known = self.analyze(document).filter_map(|term| vocabulary.column(term));
        let mut entries = self.tf_idf
            .calculate_tf(known)
            .into_iter()
            .map(|(column, tf)| FeatureEntry(column, tf * vocabulary.terms[column as usize].1))
            .collect_vec();
        self.norm.apply(entries.iter_mut().map(|value| &mut value.1));
        entries.sort_by_key(|value| value.0);
        FeatureVector { dimension: vocabulary.dimension(), entries }
    }
}


#[cfg(test)]
mod test {
    use float_cmp::approx_eq;
    use itertools::Itertools;
    use lipsum::lipsum_words_with_rng;
    use rand::{Rng, SeedableRng};
    use crate::configs::VectorizerConfig;
    use crate::error::VectorizerError;
    use crate::tf_idf::{defaults, Norm, Tf, TfIdf};
    use super::{FeatureEntry, FeatureMatrix, FeatureSpace, FeatureVector, TfIdfVectorizer, Vectorizer};

    fn default_vectorizer() -> TfIdfVectorizer {
        TfIdfVectorizer::from_config(&VectorizerConfig::default()).unwrap()
    }

    fn pseudo_random_corpus(seed: u64, documents: usize) -> Vec<String> {
        let mut random = rand::rngs::StdRng::seed_from_u64(seed);
        (0..documents)
            .map(|_| {
                let words = random.gen_range(1..30);
                lipsum_words_with_rng(rand::rngs::StdRng::seed_from_u64(random.gen()), words).to_lowercase()
            })
            .collect_vec()
    }

    #[test]
    fn vocabulary_is_sorted_and_ignores_single_characters(){
        let vectorizer = default_vectorizer();
        let vocabulary = vectorizer.fit(["rain today", "go outsid today a"]).unwrap();
        assert_eq!(vec!["go", "outsid", "rain", "today"], vocabulary.terms().collect_vec());
        assert_eq!(Some(3), vocabulary.column("today"));
        assert_eq!(None, vocabulary.column("a"));
        assert!(approx_eq!(f64, 1.0, vocabulary.idf("today").unwrap(), ulps = 2));
        assert!(approx_eq!(f64, 1.5f64.ln() + 1.0, vocabulary.idf("rain").unwrap(), ulps = 2));
    }

    #[test]
    fn rows_are_l2_normalized(){
        let vectorizer = default_vectorizer();
        let vocabulary = vectorizer.fit(["rain rain today", "today sun", "sun sun sun"]).unwrap();
        let row = vectorizer.transform("rain rain today", &vocabulary);
        let length = row.iter().map(|FeatureEntry(_, value)| value.powi(2)).sum::<f64>().sqrt();
        assert!(approx_eq!(f64, 1.0, length, epsilon = 1e-12));

        let rain = (1.0 + 2f64.ln()) * vocabulary.idf("rain").unwrap();
        let today = vocabulary.idf("today").unwrap();
        let norm = (rain.powi(2) + today.powi(2)).sqrt();
        assert!(approx_eq!(f64, rain / norm, row.get(vocabulary.column("rain").unwrap()), epsilon = 1e-12));
        assert!(approx_eq!(f64, today / norm, row.get(vocabulary.column("today").unwrap()), epsilon = 1e-12));
        assert_eq!(0.0, row.get(vocabulary.column("sun").unwrap()));
    }

    #[test]
    fn dimension_does_not_depend_on_the_input(){
        let vectorizer = default_vectorizer();
        let corpus = pseudo_random_corpus(123456, 40);
        let vocabulary = vectorizer.fit(&corpus).unwrap();
        let dimension = vocabulary.dimension();

        let unseen = pseudo_random_corpus(654321, 25);
        let matrix = vectorizer.transform_corpus(&unseen, &vocabulary);
        assert_eq!(dimension, matrix.n_columns());
        assert_eq!(25, matrix.n_rows());
        for row in matrix.rows() {
            assert_eq!(dimension, row.dimension());
        }
        assert_eq!(dimension, vectorizer.transform("completely unknown gibberish", &vocabulary).dimension());
        assert_eq!(dimension, vectorizer.transform("", &vocabulary).dimension());
    }

    #[test]
    fn empty_documents_are_zero_rows(){
        let vectorizer = default_vectorizer();
        let vocabulary = vectorizer.fit(["love sunni day", ""]).unwrap();
        let row = vectorizer.transform("", &vocabulary);
        assert_eq!(0, row.non_zero());
        assert_eq!(vec![0.0; 3], row.to_dense());
    }

    #[test]
    fn fitting_nothing_fails(){
        let vectorizer = default_vectorizer();
        assert!(matches!(vectorizer.fit(Vec::<String>::new()), Err(VectorizerError::EmptyCorpus)));
        assert!(matches!(vectorizer.fit(["", "a b"]), Err(VectorizerError::EmptyVocabulary(2))));
    }

    #[test]
    fn invalid_pattern_fails(){
        let result = TfIdfVectorizer::new(defaults::SUBLINEAR_SMOOTH, Norm::L2, "(unclosed");
        assert!(matches!(result, Err(VectorizerError::TokenPattern(_))));
    }

    #[test]
    fn raw_counts_without_norm(){
        let vectorizer = TfIdfVectorizer::new(defaults::BINARY_UNARY, Norm::None, r"\w+").unwrap();
        let vocabulary = vectorizer.fit(["a b", "b c"]).unwrap();
        let row = vectorizer.transform("b b c", &vocabulary);
        assert_eq!(vec![0.0, 1.0, 1.0], row.to_dense());
    }

    #[test]
    fn matrices_check_dimensions(){
        let good = FeatureVector::new(3, vec![FeatureEntry(2, 1.0), FeatureEntry(0, 0.5)]).unwrap();
        assert_eq!(0, good[0].0);
        assert_eq!(1.5, good.dot(&[1.0, 7.0, 1.0]));
        assert!(FeatureVector::new(3, vec![FeatureEntry(3, 1.0)]).is_err());

        let matrix = FeatureMatrix::new(3, vec![good.clone(), FeatureVector::zeros(3)]).unwrap();
        let selected = matrix.select(&[1, 0]).unwrap();
        assert_eq!(Some(&good), selected.row(1));
        assert!(matrix.select(&[2]).is_none());
        assert!(FeatureMatrix::new(4, vec![good]).is_err());
    }

    #[test]
    fn entries_compare_exactly(){
        assert_eq!(FeatureEntry(1, 0.5), FeatureEntry(1, 0.5));
        assert_ne!(FeatureEntry(1, 0.1 + 0.2), FeatureEntry(1, 0.3));
        assert!(approx_eq!(f64, (0.1 + 0.2), 0.3, ulps = 2));
    }

    #[derive(Debug)]
    struct Constant;

    impl crate::tf_idf::IdfAlgorithm for Constant {
        type Error = crate::tf_idf::IdfError;

        fn calculate_idf<C: crate::corpus::CorpusDocumentStatistics>(&self, _statistics: &C, _document_frequency: u64) -> Result<f64, Self::Error> {
            Ok(2.0)
        }
    }

    #[test]
    fn custom_idf_algorithms_can_be_fitted(){
        let vectorizer = TfIdfVectorizer::new(TfIdf::new(Tf::Binary, Constant), Norm::None, r"\w+").unwrap();
        let vocabulary = vectorizer.fit(["b a", "b"]).unwrap();
        assert_eq!(vec![2.0, 2.0], vectorizer.transform("a b", &vocabulary).to_dense());
    }
}
