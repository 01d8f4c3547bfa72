use std::process::ExitCode;

use curves::config::CurvesConfig;
use curves_engine::logging::{init_logging, LoggingConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match curves::run(CurvesConfig::from_env()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", curves::fatal_message(&err));
            ExitCode::FAILURE
        }
    }
}
