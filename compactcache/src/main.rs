mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
	arg_required_else_help = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[clap(alias = "extract")]
	/// Extract a single tile from a compact cache
	Get(tools::get::Subcommand),

	/// Show where a tile is stored, without reading any file
	Locate(tools::locate::Subcommand),

	/// List the zoom levels and bundles of a compact cache
	Probe(tools::probe::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Get(arguments) => tools::get::run(arguments),
		Commands::Locate(arguments) => tools::locate::run(arguments),
		Commands::Probe(arguments) => tools::probe::run(arguments),
	}
}
