use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;

use quick_xml::Reader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use serde::Serialize;

use crate::DoxrstError;
use crate::DoxrstResult;
use crate::config::Category;

/// Depth of `compounddef` below the document root element.
const COMPOUND_DEPTH: usize = 2;

/// The fields of a doxygen `compounddef` element that are read. Everything
/// else in the file is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundDefinition {
	/// The `kind` attribute, e.g. `file`, `class` or `struct`.
	pub kind: Option<String>,
	/// The `language` attribute, e.g. `C++`.
	pub language: Option<String>,
	/// Text of the direct `compoundname` child.
	pub compound_name: Option<String>,
	/// `file` attribute of the direct `location` child.
	pub location_file: Option<String>,
}

/// A parsed xml file and the compound definition found in it, if any.
#[derive(Debug, Clone)]
pub struct LoadedCompound {
	pub path: PathBuf,
	pub compound: Option<CompoundDefinition>,
}

/// A compound accepted for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRecord {
	/// The category kind this entity was accepted for.
	pub kind: String,
	/// Fully scoped name, passed verbatim to the rendering directive.
	pub qualified_name: String,
	/// Source path with everything up to the source marker removed.
	pub location: String,
	/// The xml file the entity was read from.
	pub source: PathBuf,
}

/// Reads doxygen xml files from one directory.
#[derive(Debug, Clone)]
pub struct Scanner {
	input: PathBuf,
	language: String,
	source_marker: String,
}

impl Scanner {
	pub fn new(
		input: impl Into<PathBuf>,
		language: impl Into<String>,
		source_marker: impl Into<String>,
	) -> Self {
		Self {
			input: input.into(),
			language: language.into(),
			source_marker: source_marker.into(),
		}
	}

	pub fn input(&self) -> &Path {
		&self.input
	}

	/// Paths of all `*.xml` files in the input directory, sorted by name.
	pub fn xml_files(&self) -> DoxrstResult<Vec<PathBuf>> {
		let mut files = Vec::new();

		for entry in std::fs::read_dir(&self.input)? {
			let entry = entry?;
			let is_xml = entry
				.file_name()
				.to_str()
				.is_some_and(|name| name.ends_with(".xml"));

			if is_xml && entry.file_type()?.is_file() {
				files.push(entry.path());
			}
		}

		files.sort();
		Ok(files)
	}

	/// Parse every xml file in the input directory once.
	pub fn load(&self) -> DoxrstResult<Vec<LoadedCompound>> {
		let files = self.xml_files()?;
		tracing::debug!(count = files.len(), input = %self.input.display(), "reading doxygen xml");

		files
			.into_iter()
			.map(|path| {
				let content = std::fs::read_to_string(&path)?;
				let compound = parse_compound(&content, &path.display().to_string())?;
				Ok(LoadedCompound { path, compound })
			})
			.collect()
	}

	/// Filter loaded compounds down to the entities of one category.
	pub fn accept(
		&self,
		loaded: &[LoadedCompound],
		category: &Category,
	) -> DoxrstResult<Vec<EntityRecord>> {
		let mut records = Vec::new();

		for item in loaded {
			let Some(compound) = &item.compound else {
				tracing::debug!(file = %item.path.display(), "no compounddef, skipping");
				continue;
			};

			if compound.kind.as_deref() != Some(category.kind.as_str()) {
				continue;
			}

			if compound.language.as_deref() != Some(self.language.as_str()) {
				tracing::debug!(
					file = %item.path.display(),
					language = ?compound.language,
					"language mismatch, skipping"
				);
				continue;
			}

			records.push(self.record(item, compound, category)?);
		}

		Ok(records)
	}

	/// Load the input directory and return the entities of one category.
	pub fn scan(&self, category: &Category) -> DoxrstResult<Vec<EntityRecord>> {
		let loaded = self.load()?;
		self.accept(&loaded, category)
	}

	fn record(
		&self,
		item: &LoadedCompound,
		compound: &CompoundDefinition,
		category: &Category,
	) -> DoxrstResult<EntityRecord> {
		let missing = |field: &str| {
			DoxrstError::MissingField {
				path: item.path.display().to_string(),
				field: field.to_string(),
			}
		};

		let qualified_name = compound
			.compound_name
			.clone()
			.filter(|name| !name.trim().is_empty())
			.ok_or_else(|| missing("compoundname"))?;
		let location_file = compound
			.location_file
			.as_deref()
			.ok_or_else(|| missing("location"))?;

		Ok(EntityRecord {
			kind: category.kind.clone(),
			qualified_name,
			location: strip_source_marker(location_file, &self.source_marker).to_string(),
			source: item.path.clone(),
		})
	}
}

/// Keep only the part of `location` after the last `marker`. The path is
/// returned unchanged when the marker is empty or absent.
pub fn strip_source_marker<'a>(location: &'a str, marker: &str) -> &'a str {
	if marker.is_empty() {
		return location;
	}

	location
		.rfind(marker)
		.map_or(location, |index| &location[index + marker.len()..])
}

/// Parse one doxygen xml document and extract its first top-level
/// `compounddef`.
///
/// Returns `Ok(None)` when the root element has no `compounddef` child. A
/// document that is not well formed is an error.
pub fn parse_compound(
	content: &str,
	path_display: &str,
) -> DoxrstResult<Option<CompoundDefinition>> {
	let mut reader = Reader::from_str(content);
	let mut depth = 0_usize;
	let mut seen_root = false;
	let mut compound: Option<CompoundDefinition> = None;
	let mut inside_compound = false;
	let mut name_text: Option<String> = None;

	loop {
		let event = reader
			.read_event()
			.map_err(|e| xml_error(path_display, e))?;

		match event {
			Event::Start(element) => {
				depth += 1;
				seen_root = true;

				if depth == COMPOUND_DEPTH
					&& compound.is_none()
					&& element.name().as_ref() == b"compounddef"
				{
					compound = Some(read_compound_attributes(&element, path_display)?);
					inside_compound = true;
				} else if inside_compound && depth == COMPOUND_DEPTH + 1 {
					match element.name().as_ref() {
						b"compoundname" => name_text = Some(String::new()),
						b"location" => read_location(&element, compound.as_mut(), path_display)?,
						_ => {}
					}
				}
			}
			Event::Empty(element) => {
				let element_depth = depth + 1;
				seen_root = true;

				if element_depth == COMPOUND_DEPTH
					&& compound.is_none()
					&& element.name().as_ref() == b"compounddef"
				{
					compound = Some(read_compound_attributes(&element, path_display)?);
				} else if inside_compound && element_depth == COMPOUND_DEPTH + 1 {
					match element.name().as_ref() {
						b"compoundname" => {
							if let Some(compound) = compound.as_mut() {
								compound.compound_name.get_or_insert_with(String::new);
							}
						}
						b"location" => read_location(&element, compound.as_mut(), path_display)?,
						_ => {}
					}
				}
			}
			Event::Text(text) => {
				if let Some(buffer) = name_text.as_mut() {
					let text = text.unescape().map_err(|e| xml_error(path_display, e))?;
					buffer.push_str(&text);
				}
			}
			Event::CData(data) => {
				if let Some(buffer) = name_text.as_mut() {
					buffer.push_str(&String::from_utf8_lossy(&data));
				}
			}
			Event::End(_) => {
				if depth == COMPOUND_DEPTH + 1 {
					if let (Some(text), Some(compound)) = (name_text.take(), compound.as_mut()) {
						compound.compound_name.get_or_insert(text);
					}
				} else if depth == COMPOUND_DEPTH {
					inside_compound = false;
				}

				depth = depth.saturating_sub(1);
			}
			Event::Eof => {
				if !seen_root {
					return Err(xml_error(path_display, "document has no root element"));
				}

				if depth != 0 {
					return Err(xml_error(path_display, "unexpected end of document"));
				}

				break;
			}
			_ => {}
		}
	}

	Ok(compound)
}

fn read_compound_attributes(
	element: &BytesStart<'_>,
	path_display: &str,
) -> DoxrstResult<CompoundDefinition> {
	Ok(CompoundDefinition {
		kind: attribute(element, "kind", path_display)?,
		language: attribute(element, "language", path_display)?,
		compound_name: None,
		location_file: None,
	})
}

fn read_location(
	element: &BytesStart<'_>,
	compound: Option<&mut CompoundDefinition>,
	path_display: &str,
) -> DoxrstResult<()> {
	let Some(compound) = compound else {
		return Ok(());
	};

	if compound.location_file.is_none() {
		compound.location_file = attribute(element, "file", path_display)?;
	}

	Ok(())
}

fn attribute(
	element: &BytesStart<'_>,
	name: &str,
	path_display: &str,
) -> DoxrstResult<Option<String>> {
	let Some(attr) = element
		.try_get_attribute(name)
		.map_err(|e| xml_error(path_display, e))?
	else {
		return Ok(None);
	};

	let value = attr
		.unescape_value()
		.map_err(|e| xml_error(path_display, e))?;

	Ok(Some(value.into_owned()))
}

fn xml_error(path_display: &str, reason: impl Display) -> DoxrstError {
	DoxrstError::Xml {
		path: path_display.to_string(),
		reason: reason.to_string(),
	}
}
