use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use doxrst_core::NamingMode;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate breathe stub pages from doxygen xml.",
	long_about = "doxrst reads the xml that doxygen writes for a C/C++ project and generates one \
	              reStructuredText page per documented file, class or struct, plus one index page \
	              per category, ready to be rendered by sphinx and breathe.\n\nQuick start:\n  \
	              doxrst init      Create a doxrst.toml\n  doxrst list      Show what would be \
	              generated\n  doxrst generate  Write the pages\n  doxrst link      Resolve a \
	              source location to a repository url"
)]
pub struct DoxrstCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory (where `doxrst.toml` lives).
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a commented `doxrst.toml` in the project root.
	///
	/// If a config file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Generate one page per accepted compound and one index per category.
	///
	/// Every run rebuilds the pages from the xml directory. Pages are
	/// written first, category indexes last.
	Generate {
		/// Doxygen xml directory. Overrides `input` from the config.
		#[arg(long, short)]
		input: Option<PathBuf>,

		/// Root directory for generated pages. Overrides `output` from the
		/// config.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// How page names are derived. Overrides `mode` from the config.
		#[arg(long, value_enum)]
		mode: Option<ModeArg>,

		/// Remove each category's page directory before writing.
		#[arg(long, default_value_t = false)]
		clean: bool,

		/// Output format for the run summary.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the compounds that would get a page, without writing anything.
	List {
		/// Doxygen xml directory. Overrides `input` from the config.
		#[arg(long, short)]
		input: Option<PathBuf>,

		/// How page names are derived. Overrides `mode` from the config.
		#[arg(long, value_enum)]
		mode: Option<ModeArg>,
	},
	/// Resolve a source location to its repository url.
	///
	/// Prints the internal anchor instead when the location cannot be
	/// mapped into the repository.
	Link {
		/// Source file, absolute or relative to the repository root.
		file: PathBuf,

		/// 1-indexed line number.
		line: usize,

		/// Symbol id used for the fallback anchor.
		#[arg(long, default_value = "symbol")]
		id: String,

		/// Output format for the link target.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
	/// Name pages after the source path below the source marker.
	Path,
	/// Name pages after the last segment of the qualified name.
	Leaf,
}

impl From<ModeArg> for NamingMode {
	fn from(value: ModeArg) -> Self {
		match value {
			ModeArg::Path => Self::Path,
			ModeArg::Leaf => Self::Leaf,
		}
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

/// Arguments of the `json2csv` binary.
#[derive(Parser)]
#[command(
	name = "json2csv",
	version,
	about = "Split a JSON export of ministers into person, position and party CSV tables."
)]
pub struct Json2CsvCli {
	/// JSON file holding an array of flat records.
	pub json: PathBuf,

	/// Two-letter country code, used for the position table and the output
	/// file names.
	pub country: String,

	/// Directory for the three CSV files. Defaults to the current directory.
	#[arg(long)]
	pub out_dir: Option<PathBuf>,

	/// Arguments after the country code are accepted and ignored.
	#[arg(hide = true, num_args = 0.., allow_hyphen_values = true)]
	pub ignored: Vec<String>,
}
