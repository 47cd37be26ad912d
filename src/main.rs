// hpp2pxd: Cython stub generator for C++ headers

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info, warn};

use hpp2pxd::cli::Cli;
use hpp2pxd::{collect_headers, run_batch};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every header produced a stub
fn run(cli: &Cli) -> anyhow::Result<bool> {
    if cli.has_partial_homes() {
        warn!("--cpp-home and --cython-home only apply together, writing stubs to the current directory");
    }
    let opts = cli.options();

    let headers = collect_headers(&cli.paths).context("cannot collect headers")?;
    if headers.is_empty() {
        bail!("no headers found");
    }

    let mut failed = 0;
    for (header, result) in headers.iter().zip(run_batch(&headers, &opts)) {
        match result {
            Ok(summary) if !summary.warnings.is_empty() => warn!(
                "{}: {} declarations left out of {}",
                header.display(),
                summary.warnings.len(),
                summary.stub_file.display()
            ),
            Ok(_) => {}
            Err(err) => {
                failed += 1;
                error!("{:#}", anyhow::Error::new(err));
            }
        }
    }

    info!("{} of {} stubs written", headers.len() - failed, headers.len());
    Ok(failed == 0)
}
