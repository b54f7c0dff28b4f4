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

use std::process::ExitCode;
use clap::Parser;
use crate::args::{consume_args, ConsumedArgs, SentimentArgs};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::logging::configure_logging;
use crate::pipeline::SentimentPipeline;

mod args;
mod config;
mod dataset;
mod error;
mod logging;
mod pipeline;
mod sentiment;

fn main() -> ExitCode {
    match consume_args(SentimentArgs::parse()) {
        Ok(ConsumedArgs::Run(config)) => match exec(config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err @ PipelineError::Logging(_)) => {
                eprintln!("Error: {err}");
                ExitCode::FAILURE
            }
            Err(err) => {
                log::error!("Error: {err}");
                ExitCode::FAILURE
            }
        },
        Ok(ConsumedArgs::Nothing) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Execute the pipeline and print the report
fn exec(config: PipelineConfig) -> Result<(), PipelineError> {
    configure_logging(&config.system)?;
    let report = SentimentPipeline::new(&config).run(&mut std::io::stdout().lock())?;
    println!("{report}");
    log::info!("Exit application.");
    Ok(())
}
