use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DoxrstError;
use crate::DoxrstResult;
use crate::emitter::NamingMode;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["doxrst.toml", ".doxrst.toml", ".config/doxrst.toml"];

/// Language tag doxygen writes for C and C++ compounds.
pub const DEFAULT_LANGUAGE: &str = "C++";

/// Public source browser used for source links when none is configured.
pub const DEFAULT_URL_TEMPLATE: &str =
	"https://github.com/PierreSenellart/provsql/blob/master/{file_path}#L{line}";

/// Commented sample written by `doxrst init`.
pub const SAMPLE_CONFIG: &str = r#"# doxrst configuration
# Every key is optional; the values below are the defaults.

# input = "../doxygen-c/xml"
# output = "c"
# language = "C++"
# project = "C++"
# source_marker = "/src/"
# extension = "rst"
# mode = "path"            # or "leaf"
# on_collision = "overwrite" # or "error"
# clean = false

# [categories.file]
# dir = "files"
# directive = "doxygenfile"

# [categories.class]
# dir = "classes"
# directive = "doxygenclass"

# [source_link]
# url_template = "https://github.com/PierreSenellart/provsql/blob/master/{file_path}#L{line}"
# repo_root = ".."
#
# [[source_link.remap]]
# from = "src/provsql.sql"
# to = "sql/provsql.sql"
"#;

/// What to do when two entities of one category map to the same page.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
	/// Keep the page written last and log a warning.
	#[default]
	Overwrite,
	/// Abort the run.
	Error,
}

/// Output metadata for one requested compound kind.
///
/// ```toml
/// [categories.struct]
/// dir = "structs"
/// directive = "doxygenstruct"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CategoryConfig {
	/// Sub-directory of the output root holding the category's pages. Also
	/// names the category index page.
	pub dir: String,
	/// Breathe directive used in every page of the category.
	pub directive: String,
}

/// A compound kind together with its output metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
	/// Value the `kind` attribute of a `compounddef` must equal.
	pub kind: String,
	pub dir: String,
	pub directive: String,
}

/// Substring replacement applied to repository paths before they are put in
/// a source url.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PathRemap {
	pub from: String,
	pub to: String,
}

/// Configuration for links from documented symbols to the public
/// repository.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceLinkConfig {
	/// Url with `{file_path}` and `{line}` placeholders.
	pub url_template: String,
	/// Repository checkout that symbol locations are relative to. Relative
	/// values are resolved against the project root.
	pub repo_root: PathBuf,
	/// Remaps applied in order to the repository-relative path.
	pub remap: Vec<PathRemap>,
}

impl Default for SourceLinkConfig {
	fn default() -> Self {
		Self {
			url_template: DEFAULT_URL_TEMPLATE.to_string(),
			repo_root: PathBuf::from(".."),
			remap: vec![PathRemap {
				from: "src/provsql.sql".to_string(),
				to: "sql/provsql.sql".to_string(),
			}],
		}
	}
}

/// Configuration loaded from a `doxrst.toml` file.
///
/// Missing keys fall back to [`DoxrstConfig::default`], which reproduces the
/// layout of the ProvSQL documentation site.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DoxrstConfig {
	/// Directory holding doxygen's xml output.
	pub input: PathBuf,
	/// Root directory for generated pages and category indexes.
	pub output: PathBuf,
	/// Only compounds whose `language` attribute equals this are accepted.
	pub language: String,
	/// Breathe project name written to every directive.
	pub project: String,
	/// Location paths are cut after the last occurrence of this marker.
	pub source_marker: String,
	/// File extension of generated pages, without the dot.
	pub extension: String,
	pub mode: NamingMode,
	pub on_collision: CollisionPolicy,
	/// Remove each category's page directory before emitting.
	pub clean: bool,
	/// Requested compound kinds keyed by the `kind` attribute value.
	pub categories: BTreeMap<String, CategoryConfig>,
	pub source_link: SourceLinkConfig,
}

impl Default for DoxrstConfig {
	fn default() -> Self {
		let mut categories = BTreeMap::new();
		categories.insert(
			"file".to_string(),
			CategoryConfig {
				dir: "files".to_string(),
				directive: "doxygenfile".to_string(),
			},
		);

		Self {
			input: PathBuf::from("../doxygen-c/xml"),
			output: PathBuf::from("c"),
			language: DEFAULT_LANGUAGE.to_string(),
			project: DEFAULT_LANGUAGE.to_string(),
			source_marker: "/src/".to_string(),
			extension: "rst".to_string(),
			mode: NamingMode::default(),
			on_collision: CollisionPolicy::default(),
			clean: false,
			categories,
			source_link: SourceLinkConfig::default(),
		}
	}
}

impl DoxrstConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> DoxrstResult<Option<DoxrstConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;

		Ok(Some(config))
	}

	/// Like [`DoxrstConfig::load`] but falls back to the defaults.
	pub fn load_or_default(root: &Path) -> DoxrstResult<DoxrstConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn from_toml(content: &str) -> DoxrstResult<DoxrstConfig> {
		toml::from_str(content).map_err(|e| DoxrstError::ConfigParse(e.to_string()))
	}

	/// The requested categories in `kind` order.
	pub fn categories(&self) -> Vec<Category> {
		self.categories
			.iter()
			.map(|(kind, meta)| {
				Category {
					kind: kind.clone(),
					dir: meta.dir.clone(),
					directive: meta.directive.clone(),
				}
			})
			.collect()
	}

	pub fn input_dir(&self, root: &Path) -> PathBuf {
		root.join(&self.input)
	}

	pub fn output_dir(&self, root: &Path) -> PathBuf {
		root.join(&self.output)
	}

	pub fn repo_root(&self, root: &Path) -> PathBuf {
		root.join(&self.source_link.repo_root)
	}
}
