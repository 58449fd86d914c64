use anyhow::Result;
use clap::Args;
use compactcache::bundle::{BundleCacheReader, StorageFormat, path::group_file_stem};
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// cache directory containing "_alllayers"
	#[arg(required = true)]
	root: PathBuf,

	/// list every bundle, not only the count per level
	#[arg(long, short)]
	list: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	// the format only affects lookups, not the directory structure
	let reader = BundleCacheReader::with_format(&arguments.root, StorageFormat::default());
	let levels = reader.list_bundles()?;

	println!("cache {:?}", reader.root());
	if levels.is_empty() {
		println!("  no bundles found");
	}

	for (zoom, bundles) in &levels {
		let incomplete = bundles.iter().filter(|b| !b.is_complete()).count();
		print!("  L{zoom:02}: {} bundle(s)", bundles.len());
		if incomplete > 0 {
			print!(", {incomplete} without matching .bundle/.bundlx");
		}
		println!();

		if arguments.list {
			for bundle in bundles {
				let missing = match (bundle.has_bundle, bundle.has_index) {
					(true, false) => " (missing .bundlx)",
					(false, true) => " (missing .bundle)",
					_ => "",
				};
				println!("    {}{missing}", group_file_stem(bundle.row_group, bundle.col_group));
			}
		}
	}
	Ok(())
}
