#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	anyhow::Context,
	clap::{CommandFactory, Parser},
	const_format::formatcp,
	ppal_toolkit::{
		extract,
		image::{PalettedImageCodec, Png},
		initLogging,
		ppal::MAGIC_STR,
		stdoutRaw, NUM_SLOTS,
	},
	std::{
		fs,
		io::{BufWriter, Write},
		path::{Path, PathBuf},
		process::ExitCode,
	},
};

const NOTE: &str = "Note: This program prints binary data to stdout. Redirect it!";

fn main() -> ExitCode {
	#[derive(Parser)]
	#[clap(
		about = formatcp!("Scan paletted images and write a {} of the palette entries they all share", MAGIC_STR),
		after_help = NOTE
	)]
	struct Args {
		/// Write the PPAL to this file instead of stdout
		#[clap(short, long, value_parser)]
		output: Option<PathBuf>,

		#[clap(value_parser)]
		images: Vec<PathBuf>,
	}
	initLogging();
	let Args { output, images } = Args::parse();
	if images.len() < 2 {
		eprintln!("{}\n{NOTE}", Args::command().render_usage());
		return ExitCode::FAILURE;
	}
	match run(output.as_deref(), &images) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("{err:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(output: Option<&Path>, images: &[PathBuf]) -> anyhow::Result<()> {
	let palettes = images
		.iter()
		.map(|path| {
			let image = fs::read(path)
				.map_err(anyhow::Error::from)
				.and_then(|bytes| Ok(Png.decode(&bytes)?))
				.with_context(|| path.display().to_string())?;
			Ok(image.palette)
		})
		.collect::<anyhow::Result<Vec<_>>>()?;
	let ppal = extract::commonPalette(&palettes)?;
	log::info!("{} of {NUM_SLOTS} palette entries are common to {} images", ppal.len(), images.len());
	match output {
		Some(path) => fs::write(path, ppal.encode()).with_context(|| path.display().to_string())?,
		None => {
			let stdout = &mut BufWriter::new(stdoutRaw());
			ppal.write(&mut *stdout)?;
			stdout.flush()?;
		}
	}
	Ok(())
}
