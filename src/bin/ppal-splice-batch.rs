#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	anyhow::Context,
	clap::Parser,
	ppal_toolkit::{
		batch::{self, Manifest},
		image::Png,
		initLogging,
	},
	std::{path::PathBuf, process::ExitCode},
};

/// At least one job was skipped.
const EXIT_SKIPPED: u8 = 2;

fn main() -> ExitCode {
	#[derive(Parser)]
	#[clap(about = "Add a PPAL into every image listed in a TOML manifest, skipping the ones that fail")]
	struct Args {
		#[clap(value_parser)]
		manifest: PathBuf,
	}
	initLogging();
	let Args { manifest } = Args::parse();
	let report = match Manifest::load(&manifest)
		.with_context(|| manifest.display().to_string())
		.and_then(|manifest| batch::run(&manifest, &Png).with_context(|| manifest.ppal.display().to_string()))
	{
		Ok(report) => report,
		Err(err) => {
			eprintln!("{err:#}");
			return ExitCode::FAILURE;
		}
	};
	log::info!("{} spliced, {} skipped", report.spliced.len(), report.skipped.len());
	if report.skipped.is_empty() {
		ExitCode::SUCCESS
	} else {
		ExitCode::from(EXIT_SKIPPED)
	}
}
