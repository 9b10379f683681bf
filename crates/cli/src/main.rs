use clap::Parser;
use ghost_cli::cli::Cli;
use ghost_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if !commands::run(cli).await {
		std::process::exit(1);
	}
}
