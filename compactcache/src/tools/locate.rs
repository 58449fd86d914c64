use super::tile_args::TileArgs;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	#[command(flatten)]
	tile: TileArgs,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let reader = arguments.tile.reader()?;
	let coord = arguments.tile.coord()?;
	let location = reader.locate(&coord)?;

	println!("tile:   {coord}");
	println!("format: {}", reader.format());
	println!("bundle: {}", location.bundle_path.display());
	println!("index:  {}", location.index_path.display());
	println!("slot:   {}", location.slot_index);
	Ok(())
}
