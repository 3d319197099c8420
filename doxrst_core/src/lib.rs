//! `doxrst_core` turns doxygen's xml output into reStructuredText stub pages
//! for [breathe](https://breathe.readthedocs.io), and links documented
//! symbols back to their source in a public repository.
//!
//! ## Processing Pipeline
//!
//! ```text
//! doxygen xml directory
//!   → Scanner (parses each compounddef, filters by kind and language)
//!   → PageEmitter (one page per entity, named by the NamingMode)
//!   → Index writer (one sorted toctree per category, after all its pages)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `doxrst.toml` loading and the default ProvSQL layout.
//! - [`scanner`]: reading `compounddef` elements into [`EntityRecord`]s.
//! - [`emitter`]: page naming and page rendering.
//! - [`index`]: category index pages.
//! - [`pipeline`]: the two-phase run tying the above together.
//! - [`source_link`]: [`TargetResolver`]s for definition links.
//! - [`convert`]: the `json2csv` table extraction.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doxrst_core::DoxrstConfig;
//! use doxrst_core::pipeline::Pipeline;
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = DoxrstConfig::load_or_default(root).unwrap();
//! let summary = Pipeline::from_config(&config, root).run().unwrap();
//! println!("{} page(s) written", summary.page_count());
//! ```

pub use config::*;
pub use emitter::*;
pub use error::*;
pub use scanner::*;
pub use source_link::*;

pub mod config;
pub mod convert;
pub mod emitter;
#[allow(unused_assignments)]
mod error;
pub mod index;
pub mod pipeline;
pub mod scanner;
pub mod source_link;

#[cfg(test)]
mod __fixtures;
