use std::env;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use borders::config::{Invocation, USAGE};
use borders::{io, mine_file, MinerError};

fn main() {
    let invocation = match Invocation::parse(env::args().skip(1)) {
        Ok(Some(invocation)) => invocation,
        Ok(None) => {
            eprintln!("{}", USAGE);
            return;
        }
        Err(err) => exit_with(err.into()),
    };

    init_tracing(invocation.verbose);
    if let Err(err) = run(&invocation) {
        exit_with(err);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(invocation: &Invocation) -> Result<()> {
    let start = Instant::now();
    let data_file = &invocation.data_file;
    let result = mine_file(data_file, &invocation.config)
        .with_context(|| format!("mining {}", data_file.display()))?;

    print!("{}", result.stats);

    if let Some(output) = &invocation.output {
        io::write_border(output, &result.border, &result.remap)
            .with_context(|| format!("saving the border to {}", output.display()))?;
    }

    if invocation.verbose {
        println!(
            "{} sets, average size {:.2} [{:.2}s]",
            result.border.len(),
            result.stats.average_size(),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

fn exit_with(err: anyhow::Error) -> ! {
    eprintln!("borders: {:#}", err);
    let code = err
        .downcast_ref::<MinerError>()
        .map_or(1, MinerError::exit_code);
    process::exit(code)
}
