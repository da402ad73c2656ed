#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	anyhow::Context,
	clap::Parser,
	ppal_toolkit::{
		image::{PalettedImageCodec, Png},
		initLogging,
		ppal::Ppal,
		splice::splice,
	},
	std::{
		fs,
		path::{Path, PathBuf},
		process::ExitCode,
	},
};

fn main() -> ExitCode {
	#[derive(Parser)]
	#[clap(about = "Add a PPAL into the palette of a paletted image")]
	struct Args {
		#[clap(value_parser)]
		inFile: PathBuf,

		#[clap(value_parser)]
		ppal: PathBuf,

		#[clap(value_parser)]
		outFile: PathBuf,

		/// Reject PPALs that repeat a palette index
		#[clap(long)]
		strict: bool,
	}
	initLogging();
	let Args { inFile, ppal, outFile, strict } = Args::parse();
	match run(&inFile, &ppal, &outFile, strict) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("{err:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(inFile: &Path, ppalFile: &Path, outFile: &Path, strict: bool) -> anyhow::Result<()> {
	let image = fs::read(inFile)
		.map_err(anyhow::Error::from)
		.and_then(|bytes| Ok(Png.decode(&bytes)?))
		.with_context(|| inFile.display().to_string())?;
	let ppal = fs::File::open(ppalFile)
		.map_err(anyhow::Error::from)
		.and_then(|file| Ok(Ppal::read(file, strict)?))
		.with_context(|| ppalFile.display().to_string())?;
	let spliced = splice(&ppal, &image)
		.with_context(|| format!("can't splice {} into {}", ppalFile.display(), inFile.display()))?;
	let mut encoded = Vec::new();
	Png.encode(&spliced, &mut encoded)?;
	fs::write(outFile, encoded).with_context(|| outFile.display().to_string())?;
	Ok(())
}
