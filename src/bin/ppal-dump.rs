#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	anyhow::Context,
	clap::Parser,
	const_format::formatcp,
	ppal_toolkit::{
		initLogging,
		ppal::{Ppal, ENTRY_SIZE, HEADER_SIZE, MAGIC_STR},
		Error,
	},
	std::{
		fs,
		io::{self, Write},
		path::{Path, PathBuf},
		process::ExitCode,
	},
};

fn main() -> ExitCode {
	#[derive(Parser)]
	#[clap(about = formatcp!(
		"List the contents of a {} file ({}-byte header, {}-byte entries)",
		MAGIC_STR,
		HEADER_SIZE,
		ENTRY_SIZE
	))]
	struct Args {
		#[clap(value_parser)]
		ppalFile: PathBuf,

		/// Print the entries as TOML instead
		#[clap(long = "toml")]
		asToml: bool,

		/// Reject files that repeat a palette index
		#[clap(long)]
		strict: bool,
	}
	initLogging();
	let Args { ppalFile, asToml, strict } = Args::parse();
	match run(&ppalFile, asToml, strict) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			match err.downcast_ref::<Error>() {
				Some(err @ Error::Format) => eprintln!("{err}"),
				_ => eprintln!("{}: {err:#}", ppalFile.display()),
			}
			ExitCode::FAILURE
		}
	}
}

fn run(ppalFile: &Path, asToml: bool, strict: bool) -> anyhow::Result<()> {
	let ppal = Ppal::read(fs::File::open(ppalFile).context("can't open")?, strict)?;
	let stdout = &mut io::stdout().lock();
	if asToml {
		stdout.write_all(toml::to_string_pretty(&ppal)?.as_bytes())?;
		return Ok(());
	}
	writeln!(stdout, "this is a PPAL file")?;
	writeln!(stdout, "there are {} entries in this file", ppal.len())?;
	for entry in ppal.entries() {
		writeln!(stdout, "{entry}")?;
	}
	Ok(())
}
