use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DoxrstError {
	#[error(transparent)]
	#[diagnostic(code(doxrst::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse doxygen xml `{path}`: {reason}")]
	#[diagnostic(
		code(doxrst::xml),
		help("regenerate the xml output with doxygen; partial or hand-edited files are not supported")
	)]
	Xml { path: String, reason: String },

	#[error("compound in `{path}` has no `{field}`")]
	#[diagnostic(
		code(doxrst::missing_field),
		help("every accepted compounddef needs a `compoundname` and a `location` with a `file` attribute")
	)]
	MissingField { path: String, field: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(doxrst::config_parse),
		help("check that doxrst.toml is valid TOML with an optional [categories] and [source_link] section")
	)]
	ConfigParse(String),

	#[error("output collision in category `{category}`: `{first}` and `{second}` both map to `{path}`")]
	#[diagnostic(
		code(doxrst::output_collision),
		help("switch to `mode = \"path\"` or set `on_collision = \"overwrite\"` to keep the last page")
	)]
	OutputCollision {
		category: String,
		path: String,
		first: String,
		second: String,
	},

	#[error("cannot name a page `{key}` for `{entity}`: {reason}")]
	#[diagnostic(
		code(doxrst::invalid_output_key),
		help("locations without the source marker keep their full path; adjust `source_marker` or use `mode = \"leaf\"`")
	)]
	InvalidOutputKey {
		entity: String,
		key: String,
		reason: String,
	},

	#[error("invalid source link template `{0}`")]
	#[diagnostic(
		code(doxrst::invalid_template),
		help("the template must contain both `{{file_path}}` and `{{line}}`")
	)]
	InvalidTemplate(String),

	#[error("cannot resolve source location `{file}`: {reason}")]
	#[diagnostic(code(doxrst::location))]
	Location { file: String, reason: String },

	#[error("failed to read json records from `{path}`: {reason}")]
	#[diagnostic(code(doxrst::json))]
	Json { path: String, reason: String },

	#[error("record {index} has no `person` field")]
	#[diagnostic(
		code(doxrst::missing_person),
		help("every record must carry a `person` entity url ending in `/Q<id>`")
	)]
	MissingPerson { index: usize },

	#[error("failed to write csv `{path}`: {reason}")]
	#[diagnostic(code(doxrst::csv))]
	Csv { path: String, reason: String },
}

pub type DoxrstResult<T> = Result<T, DoxrstError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
