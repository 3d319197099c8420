//! Link targets for documented symbols.
//!
//! The documentation renderer asks a [`TargetResolver`] where the "jump to
//! definition" link of a symbol should point. [`AnchorResolver`] gives the
//! renderer's usual internal anchor. [`SourceLinkResolver`] wraps another
//! resolver and, whenever the symbol carries a usable source location,
//! points at the file and line in the public repository instead.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::DoxrstError;
use crate::DoxrstResult;
use crate::config::PathRemap;
use crate::config::SourceLinkConfig;

const FILE_PATH_PLACEHOLDER: &str = "{file_path}";
const LINE_PLACEHOLDER: &str = "{line}";

/// Where a symbol is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
	/// Absolute path, or a path relative to the repository root.
	pub file: PathBuf,
	/// 1-indexed line number.
	pub line: usize,
}

impl SourceLocation {
	pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
		Self {
			file: file.into(),
			line,
		}
	}
}

/// A renderable symbol with documentation-comment provenance.
pub trait SymbolNode {
	/// Identifier used for internal anchors.
	fn id(&self) -> &str;

	/// The symbol's definition site. Errors and `None` both mean no source
	/// link can be built.
	fn source_location(&self) -> DoxrstResult<Option<SourceLocation>>;
}

/// A plain symbol with an optional location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
	pub id: String,
	pub location: Option<SourceLocation>,
}

impl Symbol {
	pub fn new(id: impl Into<String>, location: Option<SourceLocation>) -> Self {
		Self {
			id: id.into(),
			location,
		}
	}
}

impl SymbolNode for Symbol {
	fn id(&self) -> &str {
		&self.id
	}

	fn source_location(&self) -> DoxrstResult<Option<SourceLocation>> {
		Ok(self.location.clone())
	}
}

/// The target of a symbol's definition link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinkTarget {
	/// A link to the public repository browser.
	External { uri: String, title: String },
	/// An anchor inside the generated documentation.
	Internal { refid: String },
}

impl LinkTarget {
	pub fn is_external(&self) -> bool {
		matches!(self, Self::External { .. })
	}

	/// Render the target as an html anchor around `text`.
	pub fn to_html(&self, text: &str) -> String {
		match self {
			Self::External { uri, title } => {
				format!(
					"<a class=\"reference external\" href=\"{}\" title=\"{}\">{}</a>",
					escape_html(uri),
					escape_html(title),
					escape_html(text)
				)
			}
			Self::Internal { refid } => {
				format!(
					"<a class=\"reference internal\" href=\"#{}\">{}</a>",
					escape_html(refid),
					escape_html(text)
				)
			}
		}
	}
}

/// Decides the definition link of a symbol. Implementations must not fail.
pub trait TargetResolver {
	fn resolve_target(&self, symbol: &dyn SymbolNode) -> LinkTarget;
}

/// Resolves every symbol to an internal anchor named after its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorResolver {
	prefix: Option<String>,
}

impl AnchorResolver {
	/// Anchors are `{prefix}{id}` when `prefix` is set.
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: Some(prefix.into()),
		}
	}

	pub fn refid(&self, id: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{prefix}{id}"),
			None => id.to_string(),
		}
	}
}

impl TargetResolver for AnchorResolver {
	fn resolve_target(&self, symbol: &dyn SymbolNode) -> LinkTarget {
		LinkTarget::Internal {
			refid: self.refid(symbol.id()),
		}
	}
}

/// Links symbols to their source in the public repository, deferring to
/// `fallback` for symbols without a usable location.
#[derive(Debug, Clone)]
pub struct SourceLinkResolver<F = AnchorResolver> {
	url_template: String,
	repo_root: PathBuf,
	remaps: Vec<PathRemap>,
	fallback: F,
}

impl<F: TargetResolver> SourceLinkResolver<F> {
	/// Build a resolver from `config`. `repo_root` is the checkout that
	/// absolute symbol locations live in.
	pub fn new(config: &SourceLinkConfig, repo_root: &Path, fallback: F) -> DoxrstResult<Self> {
		let template = &config.url_template;
		if !template.contains(FILE_PATH_PLACEHOLDER) || !template.contains(LINE_PLACEHOLDER) {
			return Err(DoxrstError::InvalidTemplate(template.clone()));
		}

		Ok(Self {
			url_template: template.clone(),
			repo_root: normalize(&std::path::absolute(repo_root)?),
			remaps: config.remap.clone(),
			fallback,
		})
	}

	pub fn repo_root(&self) -> &Path {
		&self.repo_root
	}

	/// Build the external link for `location`.
	pub fn source_target(&self, location: &SourceLocation) -> DoxrstResult<LinkTarget> {
		let file_path = self.relative_path(&location.file)?;
		let url_path = self.remap(&file_path);
		let uri = self
			.url_template
			.replace(FILE_PATH_PLACEHOLDER, &url_path)
			.replace(LINE_PLACEHOLDER, &location.line.to_string());

		Ok(LinkTarget::External {
			uri,
			title: format!("{file_path} on line {}", location.line),
		})
	}

	fn try_resolve(&self, symbol: &dyn SymbolNode) -> DoxrstResult<Option<LinkTarget>> {
		let Some(location) = symbol.source_location()? else {
			return Ok(None);
		};

		self.source_target(&location).map(Some)
	}

	fn relative_path(&self, file: &Path) -> DoxrstResult<String> {
		let location_error = |reason: &str| {
			DoxrstError::Location {
				file: file.display().to_string(),
				reason: reason.to_string(),
			}
		};

		if file.as_os_str().is_empty() {
			return Err(location_error("empty path"));
		}

		let relative = if file.is_absolute() {
			normalize(file)
				.strip_prefix(&self.repo_root)
				.map_err(|_| location_error("outside of the repository root"))?
				.to_path_buf()
		} else {
			let relative = normalize(file);
			if relative.starts_with(Component::ParentDir) {
				return Err(location_error("escapes the repository root"));
			}
			relative
		};

		Ok(relative.to_string_lossy().replace('\\', "/"))
	}

	fn remap(&self, file_path: &str) -> String {
		self.remaps
			.iter()
			.fold(file_path.to_string(), |path, remap| path.replace(&remap.from, &remap.to))
	}
}

impl<F: TargetResolver> TargetResolver for SourceLinkResolver<F> {
	fn resolve_target(&self, symbol: &dyn SymbolNode) -> LinkTarget {
		match self.try_resolve(symbol) {
			Ok(Some(target)) => target,
			Ok(None) => self.fallback.resolve_target(symbol),
			Err(e) => {
				tracing::debug!(symbol = symbol.id(), error = %e, "no source link, using anchor");
				self.fallback.resolve_target(symbol)
			}
		}
	}
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();

	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				match normalized.components().next_back() {
					Some(Component::Normal(_)) => {
						normalized.pop();
					}
					// `/..` is `/`.
					Some(Component::RootDir | Component::Prefix(_)) => {}
					_ => normalized.push(component),
				}
			}
			other => normalized.push(other),
		}
	}

	normalized
}

fn escape_html(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());

	for ch in value.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			_ => escaped.push(ch),
		}
	}

	escaped
}
