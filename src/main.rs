use std::io;
use std::process::ExitCode;

use clap::Parser;
use lssecrets::{Options, Service};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // --version and --help exit here, before the bus is touched
    let options = Options::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let code = lssecrets::run(
        &options,
        Service::connect,
        io::stdout().lock(),
        io::stderr().lock(),
    );
    ExitCode::from(code)
}
