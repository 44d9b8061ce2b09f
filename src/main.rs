use std::process::ExitCode;

use clap::CommandFactory;
use normify_rs::cli::{Cli, convert_batch, try_parse_args};
use normify_rs::logger;

use tracing::{error, info};

fn main() -> ExitCode {
    let cli = match try_parse_args(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            // Bare invocation shows usage and succeeds.
            let _ = Cli::command().print_help();
            return ExitCode::SUCCESS;
        }
        Err(e) => e.exit(),
    };
    logger::init(cli.verbose);

    match convert_batch(&cli) {
        Ok(converted) => {
            info!("Done, {} converted", converted);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
