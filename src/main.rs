//! laraseed command-line entry point.

use clap::Parser;
use std::process;

use laraseed::cli::{Cli, run};

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.init();

	let cli = Cli::parse();

	if let Err(error) = run(cli).await {
		eprintln!("Error: {error:#}");
		process::exit(1);
	}
}
