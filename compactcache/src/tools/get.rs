use super::{
	sink::{FileSink, StdoutSink, TileSink},
	tile_args::TileArgs,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	#[command(flatten)]
	tile: TileArgs,

	/// output file, "-" for stdout [default: tile_<timestamp>.bin in the current directory]
	#[arg(long, short)]
	output: Option<PathBuf>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let reader = arguments.tile.reader()?;
	let coord = arguments.tile.coord()?;
	log::info!("get tile {coord:?} from {:?} ({})", reader.root(), reader.format());

	let tile = reader.get_tile_by_coord(&coord)?;

	let mut sink: Box<dyn TileSink> = match &arguments.output {
		Some(path) if path.as_os_str() == "-" => Box::new(StdoutSink),
		Some(path) => Box::new(FileSink::new(path)),
		None => Box::new(FileSink::timestamped(&std::env::current_dir()?)?),
	};
	let message = sink.write_tile(&tile)?;
	log::info!("{message}");

	Ok(())
}
