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

use std::fs::File;
use std::io::{BufWriter, Write};
use camino::{Utf8Path, Utf8PathBuf};
use classifiers::{LogisticRegressionParameters, NaiveBayesParameters, SplitParameters};
use config::Config;
use serde::{Deserialize, Serialize};
use text_processing::configs::{NormalizerConfig, VectorizerConfig};
use crate::error::PipelineError;

/// The name of the config files, without extension.
pub const CONFIG_NAME: &str = "sentiment";
/// The prefix of environment variables overriding the config.
pub const ENV_PREFIX: &str = "SENTIMENT";
/// The name of the exported example config.
pub const EXAMPLE_CONFIG_NAME: &str = "sentiment.example.yaml";

/// Everything needed to run the sentiment pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub dataset: DatasetConfig,
    pub normalizer: NormalizerConfig,
    pub vectorizer: VectorizerConfig,
    pub split: SplitParameters,
    pub naive_bayes: NaiveBayesParameters,
    pub logistic_regression: LogisticRegressionParameters,
    pub system: SystemConfig,
}

/// Where the tweets come from and how the file is laid out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetConfig {
    #[serde(default = "_default_dataset_path")]
    pub path: Utf8PathBuf,
    /// The names of the columns in the file, in order.
    #[serde(default = "_default_columns")]
    pub columns: Vec<String>,
    /// The columns removed after loading.
    #[serde(default = "_default_drop")]
    pub drop: Vec<String>,
    #[serde(default = "_default_label_column")]
    pub label_column: String,
    #[serde(default = "_default_text_column")]
    pub text_column: String,
}

fn _default_dataset_path() -> Utf8PathBuf {
    Utf8PathBuf::from("data/training.csv")
}
fn _default_columns() -> Vec<String> {
    ["target", "t_id", "created_at", "query", "user", "text"].map(str::to_string).to_vec()
}
fn _default_drop() -> Vec<String> {
    ["t_id", "created_at", "query", "user"].map(str::to_string).to_vec()
}
fn _default_label_column() -> String {
    "target".to_string()
}
fn _default_text_column() -> String {
    "text".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: _default_dataset_path(),
            columns: _default_columns(),
            drop: _default_drop(),
            label_column: _default_label_column(),
            text_column: _default_text_column(),
        }
    }
}

/// Config of the system, basically logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemConfig {
    /// The log level of the pipeline
    #[serde(default = "_default_log_level")]
    pub log_level: log::LevelFilter,

    /// Log to a file?
    #[serde(default)]
    pub log_to_file: bool,

    /// The file used when logging to a file.
    #[serde(default = "_default_log_file")]
    pub log_file: Utf8PathBuf,
}

const fn _default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}
fn _default_log_file() -> Utf8PathBuf {
    Utf8PathBuf::from("sentiment.log")
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: _default_log_level(),
            log_to_file: false,
            log_file: _default_log_file(),
        }
    }
}

impl PipelineConfig {
    /// Try to load the config from the folder [path]
    pub fn try_load_from_path<P: AsRef<Utf8Path>>(path: P) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(config::File::with_name(CONFIG_NAME).required(false))
            .add_source(config::File::with_name(path.as_ref().join(CONFIG_NAME).as_str()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("."))
            .build()?
            .try_deserialize()
    }

    /// Tries to find a config in the working directory, falls back to the defaults.
    pub fn discover_or_default() -> Result<Self, config::ConfigError> {
        match Config::builder()
            .add_source(config::File::with_name(CONFIG_NAME).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("."))
            .build()
        {
            Ok(value) => value.try_deserialize(),
            Err(err) => {
                log::debug!("No config found ({err}), using the defaults.");
                Ok(Default::default())
            }
        }
    }

    /// Writes this config as yaml to [EXAMPLE_CONFIG_NAME] in [dir].
    pub fn export_example<P: AsRef<Utf8Path>>(&self, dir: P) -> Result<Utf8PathBuf, PipelineError> {
        let target = dir.as_ref().join(EXAMPLE_CONFIG_NAME);
        let content = serde_yaml::to_string(self)?;
        let mut writer = BufWriter::new(
            File::options().write(true).create(true).truncate(true).open(&target)?
        );
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        Ok(target)
    }
}


#[cfg(test)]
mod test {
    use std::fs::File;
    use std::io::Write;
    use camino_tempfile::tempdir;
    use super::{PipelineConfig, CONFIG_NAME};

    #[test]
    fn defaults_reproduce_the_reference_run(){
        let cfg = PipelineConfig::default();
        assert_eq!("data/training.csv", cfg.dataset.path.as_str());
        assert_eq!(6, cfg.dataset.columns.len());
        assert_eq!(vec!["t_id", "created_at", "query", "user"], cfg.dataset.drop);
        assert_eq!(0.2, cfg.split.test_size);
        assert_eq!(30, cfg.split.seed);
        assert_eq!(1.0, cfg.naive_bayes.alpha);
        assert_eq!(100, cfg.logistic_regression.max_iter);
        assert_eq!(log::LevelFilter::Info, cfg.system.log_level);
    }

    #[test]
    fn partial_files_keep_the_defaults(){
        let dir = tempdir().unwrap();
        let mut file = File::create(dir.path().join(format!("{CONFIG_NAME}.yaml"))).unwrap();
        write!(file, "split:\n  seed: 7\nlogistic_regression:\n  max_iter: 5\ndataset:\n  path: tweets.csv\n").unwrap();
        drop(file);

        let cfg = PipelineConfig::try_load_from_path(dir.path()).unwrap();
        let mut expected = PipelineConfig::default();
        expected.split.seed = 7;
        expected.logistic_regression.max_iter = 5;
        expected.dataset.path = "tweets.csv".into();
        assert_eq!(expected, cfg);
    }

    #[test]
    fn the_example_is_a_valid_config(){
        let dir = tempdir().unwrap();
        let written = PipelineConfig::default().export_example(dir.path()).unwrap();
        assert!(written.exists());
        let content = std::fs::read_to_string(&written).unwrap();
        let parsed: PipelineConfig = serde_yaml::from_str(&content).unwrap();
        assert_eq!(PipelineConfig::default(), parsed);
    }

    #[test]
    fn serializes_to_json(){
        let cfg = PipelineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(cfg, serde_json::from_str::<PipelineConfig>(&json).unwrap());
    }
}
