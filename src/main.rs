use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use sysglance::cli::Cli;
use sysglance::config::{load_config, load_config_from_path};
use sysglance::logging;
use sysglance::scheduler::{Scheduler, ThreadSleeper};
use sysglance::system::collector::Collector;
use sysglance::ui::Renderer;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    logging::init()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
            e.print()?;
            return Ok(code);
        }
    };

    let file_config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    let config = match cli.resolve(&file_config.general) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut scheduler = Scheduler::new(
        config,
        Collector::from_sources(file_config.sources),
        ThreadSleeper,
        Renderer::new(stdout().lock()),
    );
    let outcome = scheduler.run()?;
    tracing::debug!(?outcome, "run finished");

    Ok(ExitCode::SUCCESS)
}
