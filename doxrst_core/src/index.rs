use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use crate::DoxrstResult;
use crate::config::Category;
use crate::emitter::PageDescriptor;
use crate::emitter::underline;
use crate::emitter::write_file;

/// `:maxdepth:` of every category toctree.
pub const INDEX_MAX_DEPTH: usize = 1;

/// Render a category index listing `entries` in ascending order. Duplicate
/// entries appear once.
pub fn render_index<'a>(category: &Category, entries: impl IntoIterator<Item = &'a str>) -> String {
	let title = capitalize(&category.dir);
	let entries: BTreeSet<&str> = entries.into_iter().collect();

	let mut index = format!(
		"{title}\n{underline}\n\n.. toctree::\n   :maxdepth: {INDEX_MAX_DEPTH}\n\n",
		underline = underline(&title),
	);

	for entry in entries {
		index.push_str("   ");
		index.push_str(entry);
		index.push('\n');
	}

	index
}

/// Write `{output}/{dir}.{extension}` for a category whose pages have all
/// been emitted.
pub fn write_index(
	output: &Path,
	extension: &str,
	category: &Category,
	pages: &[PageDescriptor],
) -> DoxrstResult<PathBuf> {
	let path = output.join(format!("{}.{extension}", category.dir));
	let content = render_index(category, pages.iter().map(|page| page.relative.as_str()));

	write_file(&path, &content)?;
	tracing::debug!(index = %path.display(), pages = pages.len(), "wrote category index");

	Ok(path)
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(value: &str) -> String {
	let mut chars = value.chars();
	let Some(first) = chars.next() else {
		return String::new();
	};

	first
		.to_uppercase()
		.chain(chars.flat_map(char::to_lowercase))
		.collect()
}
