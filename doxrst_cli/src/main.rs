use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use doxrst_cli::Commands;
use doxrst_cli::DoxrstCli;
use doxrst_cli::ModeArg;
use doxrst_cli::OutputFormat;
use doxrst_core::AnchorResolver;
use doxrst_core::DoxrstConfig;
use doxrst_core::LinkTarget;
use doxrst_core::SAMPLE_CONFIG;
use doxrst_core::SourceLinkResolver;
use doxrst_core::SourceLocation;
use doxrst_core::Symbol;
use doxrst_core::TargetResolver;
use doxrst_core::pipeline::Pipeline;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DoxrstCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Generate {
			input,
			output,
			mode,
			clean,
			format,
		}) => {
			run_generate(
				&args,
				input.as_deref(),
				output.as_deref(),
				*mode,
				*clean,
				*format,
			)
		}
		Some(Commands::List { input, mode }) => run_list(&args, input.as_deref(), *mode),
		Some(Commands::Link {
			file,
			line,
			id,
			format,
		}) => run_link(&args, file, *line, id, *format),
		None => {
			eprintln!("No subcommand specified. Run `doxrst --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<doxrst_core::DoxrstError>() {
			Ok(doxrst_err) => {
				let report: miette::Report = (*doxrst_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Diagnostics go to stderr so that stdout stays parseable. `RUST_LOG`
/// takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_ansi(use_color)
		.init();
}

fn resolve_root(args: &DoxrstCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(
	root: &Path,
	input: Option<&Path>,
	mode: Option<ModeArg>,
) -> Result<DoxrstConfig, Box<dyn std::error::Error>> {
	let mut config = DoxrstConfig::load_or_default(root)?;

	if let Some(input) = input {
		config.input = input.to_path_buf();
	}
	if let Some(mode) = mode {
		config.mode = mode.into();
	}

	Ok(config)
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

fn run_init(args: &DoxrstCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = DoxrstConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	std::fs::write(root.join("doxrst.toml"), SAMPLE_CONFIG)?;
	println!("Created doxrst.toml");
	println!();
	println!("Next steps:");
	println!("  1. Point `input` at the xml directory written by doxygen");
	println!("  2. Run `doxrst list` to check which compounds are picked up");
	println!("  3. Run `doxrst generate` to write the pages");

	Ok(())
}

fn run_generate(
	args: &DoxrstCli,
	input: Option<&Path>,
	output: Option<&Path>,
	mode: Option<ModeArg>,
	clean: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut config = load_config(&root, input, mode)?;

	if let Some(output) = output {
		config.output = output.to_path_buf();
	}
	if clean {
		config.clean = true;
	}

	let summary = Pipeline::from_config(&config, &root).run()?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&summary)?);
		}
		OutputFormat::Text => {
			for report in &summary.categories {
				println!(
					"  {} {} page(s) -> {}",
					colored!(format!("{}:", report.kind), bold),
					report.pages.len(),
					make_relative(&report.index, &root)
				);
			}

			println!(
				"\n{} Generated {} page(s) in {} categor{}.",
				colored!("✓", green),
				summary.page_count(),
				summary.categories.len(),
				if summary.categories.len() == 1 {
					"y"
				} else {
					"ies"
				}
			);
		}
	}

	Ok(())
}

fn run_list(
	args: &DoxrstCli,
	input: Option<&Path>,
	mode: Option<ModeArg>,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root, input, mode)?;
	let discovered = Pipeline::from_config(&config, &root).discover()?;

	let mut total = 0;
	for (position, found) in discovered.iter().enumerate() {
		if position > 0 {
			println!();
		}
		println!(
			"{}",
			colored!(format!("{} ({}):", found.category.kind, found.category.dir), bold)
		);

		if found.entities.is_empty() {
			println!("  (none)");
		}

		for entity in &found.entities {
			let output_key = config.mode.output_key(entity);
			println!(
				"  {} -> {}/{output_key}",
				entity.qualified_name, found.category.dir
			);
		}

		total += found.entities.len();
	}

	println!("\n{total} compound(s)");

	Ok(())
}

fn run_link(
	args: &DoxrstCli,
	file: &Path,
	line: usize,
	id: &str,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DoxrstConfig::load_or_default(&root)?;
	let resolver = SourceLinkResolver::new(
		&config.source_link,
		&config.repo_root(&root),
		AnchorResolver::default(),
	)?;

	let symbol = Symbol::new(id, Some(SourceLocation::new(file, line)));
	let target = resolver.resolve_target(&symbol);

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&target)?);
		}
		OutputFormat::Text => {
			match &target {
				LinkTarget::External { uri, title } => {
					println!("{uri}");
					println!("{} {title}", colored!("title:", bold));
				}
				LinkTarget::Internal { refid } => {
					println!("#{refid}");
					println!(
						"{} location is outside {}",
						colored!("internal:", bold),
						resolver.repo_root().display()
					);
				}
			}
		}
	}

	Ok(())
}
