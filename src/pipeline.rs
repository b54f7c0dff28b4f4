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

use std::fmt::{Display, Formatter};
use std::io::Write;
use classifiers::metrics::accuracy;
use classifiers::{train_test_split, Classifier, Convergence, Label, LogisticRegression, MultinomialNaiveBayes, TrainTestSplit};
use itertools::Itertools;
use text_processing::stopword_registry::StopWordRegistry;
use text_processing::{FeatureMatrix, TextNormalizer, TfIdfVectorizer, Vectorizer};
use time::OffsetDateTime;
use crate::config::PipelineConfig;
use crate::dataset::{Dataset, Record};
use crate::error::PipelineError;
use crate::sentiment::Sentiment;

/// Runs [f] and returns its result with the elapsed wall clock seconds.
fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = OffsetDateTime::now_utc();
    let result = f();
    (result, (OffsetDateTime::now_utc() - start).as_seconds_f64())
}

/// The evaluation of one model.
#[derive(Debug, Copy, Clone)]
pub struct ModelReport {
    pub accuracy: f64,
    /// Seconds for training and predicting.
    pub seconds: f64,
    pub convergence: Convergence,
}

/// The outcome of a pipeline run. Displays the timings, the accuracies are
/// written while the pipeline runs.
#[derive(Debug, Copy, Clone)]
pub struct PipelineReport {
    pub load_seconds: f64,
    pub train_records: usize,
    pub test_records: usize,
    pub naive_bayes: ModelReport,
    pub logistic_regression: ModelReport,
}

impl Display for PipelineReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "time dif:")?;
        writeln!(f, "load:  {:?}", self.load_seconds)?;
        writeln!(f, "bayes:  {:?}", self.naive_bayes.seconds)?;
        write!(f, "logreg:  {:?}", self.logistic_regression.seconds)
    }
}

/// Load, clean, vectorize, split, then train and score both models.
pub struct SentimentPipeline<'a> {
    config: &'a PipelineConfig,
}

impl<'a> SentimentPipeline<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs the whole pipeline on the configured dataset. The accuracy of each model
    /// is written to [out] as soon as the model is scored.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<PipelineReport, PipelineError> {
        let dataset_cfg = &self.config.dataset;
        log::info!("Loading {}.", dataset_cfg.path);
        let (dataset, load_seconds) = timed(|| Dataset::load(&dataset_cfg.path, &dataset_cfg.columns));
        self.evaluate(dataset?, load_seconds, out)
    }

    /// Runs everything after loading on [dataset].
    pub fn evaluate<W: Write>(&self, mut dataset: Dataset, load_seconds: f64, out: &mut W) -> Result<PipelineReport, PipelineError> {
        let dataset_cfg = &self.config.dataset;
        if dataset.is_empty() {
            log::warn!("The dataset does not contain a single row.");
        }
        dataset.remove_columns(&dataset_cfg.drop)?;
        let records = dataset.into_records(&dataset_cfg.label_column, &dataset_cfg.text_column)?;
        log::info!(
            "Got {} records ({}).",
            records.len(),
            records.iter()
                .map(|record| Sentiment::from_code(record.target))
                .counts()
                .into_iter()
                .sorted()
                .map(|(sentiment, count)| format!("{sentiment}: {count}"))
                .join(", ")
        );

        let (features, labels) = self.vectorize(records)?;
        let split = train_test_split(&features, &labels, &self.config.split)?;
        log::info!("Training on {} records, testing on {}.", split.y_train.len(), split.y_test.len());

        let naive_bayes = evaluate_model::<MultinomialNaiveBayes>(&self.config.naive_bayes, &split)?;
        log::info!("Naive bayes: accuracy {}, {}.", naive_bayes.accuracy, naive_bayes.convergence);
        writeln!(out, "{:?}", naive_bayes.accuracy)?;
        let logistic_regression = evaluate_model::<LogisticRegression>(&self.config.logistic_regression, &split)?;
        log::info!("Logistic regression: accuracy {}, {}.", logistic_regression.accuracy, logistic_regression.convergence);
        writeln!(out, "{:?}", logistic_regression.accuracy)?;

        Ok(PipelineReport {
            load_seconds,
            train_records: split.y_train.len(),
            test_records: split.y_test.len(),
            naive_bayes,
            logistic_regression
        })
    }

    /// Normalizes the texts and turns them into tf-idf rows.
    fn vectorize(&self, records: Vec<Record>) -> Result<(FeatureMatrix, Vec<Label>), PipelineError> {
        let registry = StopWordRegistry::initialize(&self.config.normalizer.stopwords);
        let normalizer = TextNormalizer::from_config(&self.config.normalizer, &registry);
        log::debug!("Normalizing with {normalizer:?}.");

        let (labels, texts): (Vec<Label>, Vec<String>) = records
            .into_iter()
            .map(|Record { target, text }| (target, normalizer.normalize(&text)))
            .unzip();

        let vectorizer = TfIdfVectorizer::from_config(&self.config.vectorizer)?;
        let vocabulary = vectorizer.fit(&texts)?;
        log::info!("The vocabulary has {} terms.", vocabulary.len());
        Ok((vectorizer.transform_corpus(&texts, &vocabulary), labels))
    }
}

/// Trains [C] on the train partition and scores it on the test partition.
fn evaluate_model<C: Classifier>(parameters: &C::Parameters, split: &TrainTestSplit) -> Result<ModelReport, PipelineError> {
    let (result, seconds) = timed(|| -> Result<_, PipelineError> {
        let trained = C::fit(parameters, &split.x_train, &split.y_train)?;
        let predicted = trained.model.predict(&split.x_test)?;
        Ok((accuracy(&split.y_test, &predicted)?, trained.convergence))
    });
    let (accuracy, convergence) = result?;
    Ok(ModelReport { accuracy, seconds, convergence })
}
