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

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use thiserror::Error;
use crate::config::SystemConfig;

const PATTERN: &str = "{l}@Thread{I} - {d} - {m}{n}";

/// The crates logging at the configured level, everything else logs warnings only.
const LOGGED_CRATES: [&str; 3] = ["tweet_sentiment", "text_processing", "classifiers"];

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open the log file: {0}")]
    File(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigErrors),
    #[error(transparent)]
    Init(#[from] log::SetLoggerError),
}

fn logging_config(system: &SystemConfig) -> Result<Config, LoggingError> {
    let config = Config::builder();

    let config = if system.log_to_file {
        let file_logger = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build(&system.log_file)?;
        config.appender(Appender::builder().build("out", Box::new(file_logger)))
    } else {
        // stdout carries the report
        let console_logger = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .target(Target::Stderr)
            .build();
        config.appender(Appender::builder().build("out", Box::new(console_logger)))
    };

    let config = LOGGED_CRATES.iter().fold(config, |config, name| {
        config.logger(Logger::builder().build(*name, system.log_level))
    });

    Ok(config.build(Root::builder().appender("out").build(LevelFilter::Warn))?)
}

/// Configure the logging
pub fn configure_logging(system: &SystemConfig) -> Result<(), LoggingError> {
    let config = logging_config(system)?;
    if system.log_to_file {
        eprintln!("Logging to {}!", system.log_file);
    }
    log4rs::init_config(config)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use camino_tempfile::tempdir;
    use crate::config::SystemConfig;
    use crate::error::PipelineError;
    use super::{logging_config, LoggingError};

    #[test]
    fn builds_console_and_file_configs(){
        let console = logging_config(&SystemConfig::default()).unwrap();
        assert_eq!(3, console.loggers().len());
        assert_eq!(log::LevelFilter::Warn, console.root().level());

        let dir = tempdir().unwrap();
        let system = SystemConfig {
            log_level: log::LevelFilter::Trace,
            log_to_file: true,
            log_file: dir.path().join("out.log"),
        };
        let file = logging_config(&system).unwrap();
        assert!(file.loggers().iter().all(|logger| logger.level() == log::LevelFilter::Trace));
        assert!(dir.path().join("out.log").exists());
    }

    #[test]
    fn unusable_log_files_stop_the_pipeline(){
        let dir = tempdir().unwrap();
        let blocking_file = dir.path().join("not_a_dir");
        std::fs::write(&blocking_file, "").unwrap();
        let system = SystemConfig {
            log_to_file: true,
            log_file: blocking_file.join("out.log"),
            ..SystemConfig::default()
        };
        let err: PipelineError = logging_config(&system).unwrap_err().into();
        assert!(matches!(err, PipelineError::Logging(LoggingError::File(_))));
    }
}
