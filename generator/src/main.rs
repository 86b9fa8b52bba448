mod cli;

use clap::{CommandFactory, Parser};
use std::{error::Error as _, process::ExitCode};
use tracing_subscriber::EnvFilter;
use xsdgen::Options;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (Some(schema), Some(output), Some(namespace)) =
        (cli.schema.as_ref(), cli.output.as_ref(), cli.namespace.as_ref())
    else {
        // Usage is not an error
        if let Err(error) = cli::Cli::command().print_help() {
            tracing::warn!(%error, "could not print usage");
        }
        return ExitCode::SUCCESS;
    };

    let options = Options {
        namespace: Some(namespace.clone()),
        common_namespace: cli.common_namespace.clone(),
        allow_dtd: cli.allow_dtd,
    };
    match xsdgen::generate_file(schema, output, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            println!("error: {error}");
            let mut source = error.source();
            while let Some(cause) = source {
                println!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
