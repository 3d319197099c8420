use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use doxrst_cli::Json2CsvCli;
use doxrst_core::convert::convert;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: json2csv data.json CC";

fn main() {
	let args = match Json2CsvCli::try_parse() {
		Ok(args) => args,
		Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
		Err(_) => {
			println!("{USAGE}");
			process::exit(1);
		}
	};

	let use_color = std::env::var_os("NO_COLOR").is_none();
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_ansi(use_color)
		.init();

	let out_dir = args.out_dir.unwrap_or_else(|| PathBuf::from("."));

	match convert(&args.json, &args.country, &out_dir) {
		Ok(summary) => {
			println!(
				"{} person(s) -> {}",
				summary.persons,
				summary.person_file.display()
			);
			println!(
				"{} position(s) -> {}",
				summary.positions,
				summary.position_file.display()
			);
			println!(
				"{} party row(s) -> {}",
				summary.parties,
				summary.party_file.display()
			);
		}
		Err(e) => {
			let report: miette::Report = e.into();
			eprintln!("{report:?}");
			process::exit(2);
		}
	}
}
