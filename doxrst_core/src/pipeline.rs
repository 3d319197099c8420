use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::DoxrstError;
use crate::DoxrstResult;
use crate::config::Category;
use crate::config::CollisionPolicy;
use crate::config::DoxrstConfig;
use crate::emitter::PageDescriptor;
use crate::emitter::PageEmitter;
use crate::index::write_index;
use crate::scanner::EntityRecord;
use crate::scanner::Scanner;

/// Entities accepted for one category.
#[derive(Debug, Clone)]
pub struct DiscoveredCategory {
	pub category: Category,
	pub entities: Vec<EntityRecord>,
}

/// Pages written for one category during the emission phase.
#[derive(Debug, Clone)]
pub struct EmittedCategory {
	pub category: Category,
	pub pages: Vec<PageDescriptor>,
}

/// Outcome of a full run for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
	pub kind: String,
	pub dir: String,
	pub index: PathBuf,
	pub pages: Vec<PageDescriptor>,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
	pub categories: Vec<CategoryReport>,
}

impl GenerateSummary {
	pub fn page_count(&self) -> usize {
		self.categories.iter().map(|report| report.pages.len()).sum()
	}

	/// Category index names for a top-level toctree.
	pub fn toc_entries(&self) -> Vec<String> {
		self.categories
			.iter()
			.map(|report| report.dir.clone())
			.collect()
	}
}

/// Two-phase page generation: emit every page of every category, then
/// assemble the category indexes from what was emitted.
#[derive(Debug, Clone)]
pub struct Pipeline {
	scanner: Scanner,
	emitter: PageEmitter,
	categories: Vec<Category>,
	output: PathBuf,
	extension: String,
	on_collision: CollisionPolicy,
	clean: bool,
}

impl Pipeline {
	/// Build a pipeline from `config`, resolving its paths against `root`.
	pub fn from_config(config: &DoxrstConfig, root: &Path) -> Self {
		let output = config.output_dir(root);

		Self {
			scanner: Scanner::new(
				config.input_dir(root),
				config.language.clone(),
				config.source_marker.clone(),
			),
			emitter: PageEmitter::new(
				output.clone(),
				config.project.clone(),
				config.extension.clone(),
				config.mode,
			),
			categories: config.categories(),
			output,
			extension: config.extension.clone(),
			on_collision: config.on_collision,
			clean: config.clean,
		}
	}

	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	/// Scan the input directory without writing anything.
	pub fn discover(&self) -> DoxrstResult<Vec<DiscoveredCategory>> {
		let loaded = self.scanner.load()?;

		self.categories
			.iter()
			.map(|category| {
				let entities = self.scanner.accept(&loaded, category)?;
				Ok(DiscoveredCategory {
					category: category.clone(),
					entities,
				})
			})
			.collect()
	}

	/// First phase: write one page per accepted entity.
	pub fn emit_pages(&self) -> DoxrstResult<Vec<EmittedCategory>> {
		let discovered = self.discover()?;
		let mut emitted = Vec::with_capacity(discovered.len());

		for DiscoveredCategory { category, entities } in discovered {
			if self.clean {
				self.clean_category(&category)?;
			}

			let pages = self.emit_category(&category, &entities)?;
			tracing::info!(category = %category.kind, pages = pages.len(), "emitted pages");
			emitted.push(EmittedCategory { category, pages });
		}

		Ok(emitted)
	}

	/// Second phase: write the index of every emitted category.
	pub fn assemble_indexes(&self, emitted: Vec<EmittedCategory>) -> DoxrstResult<GenerateSummary> {
		let mut categories = Vec::with_capacity(emitted.len());

		for EmittedCategory { category, pages } in emitted {
			let index = write_index(&self.output, &self.extension, &category, &pages)?;
			categories.push(CategoryReport {
				kind: category.kind,
				dir: category.dir,
				index,
				pages,
			});
		}

		Ok(GenerateSummary { categories })
	}

	/// Run both phases.
	pub fn run(&self) -> DoxrstResult<GenerateSummary> {
		tracing::info!(
			input = %self.scanner.input().display(),
			output = %self.output.display(),
			mode = ?self.emitter.mode(),
			"generating pages"
		);

		let emitted = self.emit_pages()?;
		let summary = self.assemble_indexes(emitted)?;

		tracing::info!(pages = summary.page_count(), "generation finished");
		Ok(summary)
	}

	fn emit_category(
		&self,
		category: &Category,
		entities: &[EntityRecord],
	) -> DoxrstResult<Vec<PageDescriptor>> {
		let mut pages: Vec<PageDescriptor> = Vec::with_capacity(entities.len());
		let mut written: HashMap<PathBuf, usize> = HashMap::new();

		for entity in entities {
			let output_key = self.emitter.page_key(entity)?;
			let (path, _) = self.emitter.locate(category, &output_key);

			if let Some(&previous) = written.get(&path) {
				let first = pages[previous].qualified_name.clone();

				if self.on_collision == CollisionPolicy::Error {
					return Err(DoxrstError::OutputCollision {
						category: category.kind.clone(),
						path: path.display().to_string(),
						first,
						second: entity.qualified_name.clone(),
					});
				}

				tracing::warn!(
					page = %path.display(),
					replaced = %first,
					by = %entity.qualified_name,
					"page collision, keeping the last entity"
				);
				pages[previous] = self.emitter.emit(entity, category)?;
				continue;
			}

			let page = self.emitter.emit(entity, category)?;
			written.insert(page.path.clone(), pages.len());
			pages.push(page);
		}

		Ok(pages)
	}

	fn clean_category(&self, category: &Category) -> DoxrstResult<()> {
		let dir = self.output.join(&category.dir);

		if dir.is_dir() {
			tracing::debug!(dir = %dir.display(), "removing previous pages");
			std::fs::remove_dir_all(&dir)?;
		}

		Ok(())
	}
}
