//! research-rs binary entry point.

use clap::Parser;
use research_rs::cli::{Cli, execute};
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "research_rs=debug"
    } else {
        "research_rs=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match execute(&cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
