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

use camino::Utf8PathBuf;
use clap::Parser;
use crate::config::PipelineConfig;
use crate::error::PipelineError;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
/// Trains naive bayes and logistic regression on labeled tweets and reports their accuracy.
pub struct SentimentArgs {
    /// A command to initialize an exemplary config
    #[arg(long)]
    pub generate_example_config: bool,

    /// The folder containing the config.
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// The csv file with the tweets, overrides the config.
    #[arg(short, long)]
    pub dataset: Option<Utf8PathBuf>,

    /// The seed of the train/test split, overrides the config.
    #[arg(long)]
    pub seed: Option<u64>,

    /// The share of records used for testing, overrides the config.
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Maximum iterations of the logistic regression solver, overrides the config.
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Overrides the log level from the config.
    #[arg(long)]
    pub log_level: Option<log::LevelFilter>,

    /// Log to file
    #[arg(long)]
    pub log_to_file: bool,
}

#[derive(Debug)]
pub enum ConsumedArgs {
    Run(PipelineConfig),
    Nothing
}

/// Consumes the args and returns everything necessary to run the pipeline
pub(crate) fn consume_args(args: SentimentArgs) -> Result<ConsumedArgs, PipelineError> {
    if args.generate_example_config {
        let written = PipelineConfig::default().export_example(".")?;
        println!("Wrote {written}. Rename it to sentiment.yaml to use it as the default config.");
        return Ok(ConsumedArgs::Nothing)
    }

    let mut config = match args.config {
        None => PipelineConfig::discover_or_default()?,
        Some(path) => PipelineConfig::try_load_from_path(path)?
    };

    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }
    if let Some(seed) = args.seed {
        config.split.seed = seed;
    }
    if let Some(test_size) = args.test_size {
        config.split.test_size = test_size;
    }
    if let Some(max_iter) = args.max_iter {
        config.logistic_regression.max_iter = max_iter;
    }
    if let Some(log_level) = args.log_level {
        config.system.log_level = log_level;
    }
    if args.log_to_file {
        config.system.log_to_file = true;
    }

    Ok(ConsumedArgs::Run(config))
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use super::{consume_args, ConsumedArgs, SentimentArgs};

    #[test]
    fn flags_override_the_config(){
        let args = SentimentArgs::try_parse_from([
            "tweet_sentiment",
            "--dataset", "tweets.csv",
            "--seed", "7",
            "--test-size", "0.25",
            "--max-iter", "1000",
            "--log-level", "debug",
            "--log-to-file",
        ]).unwrap();
        let ConsumedArgs::Run(config) = consume_args(args).unwrap() else {
            panic!("Expected a run config!")
        };
        assert_eq!("tweets.csv", config.dataset.path.as_str());
        assert_eq!(7, config.split.seed);
        assert_eq!(0.25, config.split.test_size);
        assert_eq!(1000, config.logistic_regression.max_iter);
        assert_eq!(log::LevelFilter::Debug, config.system.log_level);
        assert!(config.system.log_to_file);
    }

    #[test]
    fn no_flags_keep_the_defaults(){
        let args = SentimentArgs::try_parse_from(["tweet_sentiment"]).unwrap();
        assert!(matches!(consume_args(args).unwrap(), ConsumedArgs::Run(_)));
    }
}
