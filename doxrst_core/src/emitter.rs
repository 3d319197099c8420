use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DoxrstError;
use crate::DoxrstResult;
use crate::config::Category;
use crate::scanner::EntityRecord;

/// Directives that additionally list members.
const MEMBER_DIRECTIVES: [&str; 2] = ["doxygenclass", "doxygenstruct"];

/// How a page name is derived from an entity. Chosen once per run.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
	/// Use the source path below the source marker. Pages mirror the source
	/// tree and may be nested.
	#[default]
	Path,
	/// Use the last `::` segment of the qualified name with `/` flattened to
	/// `_`. Entities sharing a leaf name overwrite each other.
	Leaf,
}

impl NamingMode {
	pub fn output_key(self, entity: &EntityRecord) -> String {
		match self {
			Self::Path => entity.location.clone(),
			Self::Leaf => leaf_name(&entity.qualified_name).replace('/', "_"),
		}
	}
}

/// Why `key` cannot name a page below the category directory, if it can't.
fn invalid_key_reason(key: &str) -> Option<&'static str> {
	if key.is_empty() {
		return Some("the name is empty");
	}

	if key.ends_with('/') {
		return Some("the name ends with a directory separator");
	}

	let escapes = Path::new(key).components().any(|component| {
		matches!(
			component,
			Component::RootDir | Component::Prefix(_) | Component::ParentDir
		)
	});

	escapes.then_some("the name is absolute or climbs out of the category directory")
}

fn leaf_name(qualified_name: &str) -> &str {
	qualified_name
		.rsplit("::")
		.next()
		.unwrap_or(qualified_name)
}

/// A page written by the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
	/// Kind of the category the page belongs to.
	pub category: String,
	pub output_key: String,
	/// Index entry for the page: `{dir}/{output_key}`, without extension.
	pub relative: String,
	/// Absolute location of the written file.
	pub path: PathBuf,
	/// Qualified name of the documented entity.
	pub qualified_name: String,
}

/// Writes one stub page per entity below an output root.
#[derive(Debug, Clone)]
pub struct PageEmitter {
	output: PathBuf,
	project: String,
	extension: String,
	mode: NamingMode,
}

impl PageEmitter {
	pub fn new(
		output: impl Into<PathBuf>,
		project: impl Into<String>,
		extension: impl Into<String>,
		mode: NamingMode,
	) -> Self {
		Self {
			output: output.into(),
			project: project.into(),
			extension: extension.into(),
			mode,
		}
	}

	pub fn mode(&self) -> NamingMode {
		self.mode
	}

	/// The output key of `entity`, checked to name a page inside the
	/// category directory.
	pub fn page_key(&self, entity: &EntityRecord) -> DoxrstResult<String> {
		let output_key = self.mode.output_key(entity);

		if let Some(reason) = invalid_key_reason(&output_key) {
			return Err(DoxrstError::InvalidOutputKey {
				entity: entity.qualified_name.clone(),
				key: output_key,
				reason: reason.to_string(),
			});
		}

		Ok(output_key)
	}

	/// Where the page for `output_key` lands, and its index entry.
	pub fn locate(&self, category: &Category, output_key: &str) -> (PathBuf, String) {
		let relative = format!("{}/{output_key}", category.dir);
		let path = self
			.output
			.join(&category.dir)
			.join(format!("{output_key}.{}", self.extension));

		(path, relative)
	}

	/// Write the page for `entity` and describe it.
	pub fn emit(&self, entity: &EntityRecord, category: &Category) -> DoxrstResult<PageDescriptor> {
		let output_key = self.page_key(entity)?;
		let (path, relative) = self.locate(category, &output_key);
		let content = render_page(
			&output_key,
			&category.directive,
			&entity.qualified_name,
			&self.project,
		);

		write_file(&path, &content)?;
		tracing::debug!(page = %relative, entity = %entity.qualified_name, "wrote page");

		Ok(PageDescriptor {
			category: category.kind.clone(),
			output_key,
			relative,
			path,
			qualified_name: entity.qualified_name.clone(),
		})
	}
}

/// Render a stub page: a label, a title and the breathe directive block.
pub fn render_page(
	output_key: &str,
	directive: &str,
	qualified_name: &str,
	project: &str,
) -> String {
	let mut page = format!(
		".. _{label}:\n\n{title}\n{underline}\n\n.. {directive}:: {qualified_name}\n   :project: \
		 {project}\n   :allow-dot-graphs:\n",
		label = output_key.to_lowercase(),
		title = output_key,
		underline = underline(output_key),
	);

	if MEMBER_DIRECTIVES.contains(&directive) {
		page.push_str("   :members:\n");
		page.push_str("   :protected-members:\n");
		page.push_str("   :undoc-members:\n");
	}

	page
}

/// A `=` rule as long as `title` in characters.
pub(crate) fn underline(title: &str) -> String {
	"=".repeat(title.chars().count())
}

pub(crate) fn write_file(path: &Path, content: &str) -> DoxrstResult<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}

	std::fs::write(path, content)?;
	Ok(())
}
