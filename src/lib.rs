//! # bibtags: Tag and Period Reports for a Bibliographic Library
//!
//! Reads the items and collections of a reference library (Zotero web API
//! shape), derives per-item attributes and renders static HTML reports, tag
//! cross-tabulations, an index page and a period timeline (SVG).
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `LibrarySource` is the contract between data access and the pipeline
//! 2. **Pure middle**: normalizing, aggregating and rendering never touch the filesystem
//! 3. **Explicit context**: one `RunContext` per run, no globals
//! 4. **Build-cache output**: existing files are skipped, delete to rebuild
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bibtags::{Bibliography, Config, DumpSource};
//! use bibtags::output::ArtifactWriter;
//!
//! # fn example() -> bibtags::Result<()> {
//! let config = Config::load("bibtags.toml".as_ref())?;
//! let bib = Bibliography::with_source(DumpSource::new("library.json"));
//! let ctx = bib.context(config)?;
//!
//! let writer = ArtifactWriter::new(&ctx.config().output_dir);
//! let summary = bibtags::pipeline::run_all(&ctx, &writer)?;
//! println!("{} written, {} skipped", summary.written.len(), summary.skipped.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Sources
//!
//! | Source | Feature | Description |
//! |--------|---------|-------------|
//! | Dump | (default) | `{"items", "collections"}` JSON file |
//! | Memory | (default) | Already-loaded library for tests/embedding |
//! | Web | `online` | Zotero web API, optionally behind a JSON cache |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod normalize;
pub mod period;
pub mod tags;
pub mod tree;
pub mod render;
pub mod output;
pub mod source;
pub mod config;
pub mod pipeline;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{Collection, Creator, Item, Library, Tag};

// ============================================================================
// Re-exports: Derived data
// ============================================================================

pub use normalize::{NormalizedItem, UniqueNames};
pub use period::{Period, PeriodCounts, PeriodSurvey, SingleYearPolicy};
pub use tags::{ScenarioTable, SubcategoryMap, TagRecord, TagTable};
pub use tree::CollectionTree;

// ============================================================================
// Re-exports: Sources, configuration, pipeline
// ============================================================================

pub use source::{DumpSource, LibrarySource, MemorySource, SourceConfig};
pub use config::{Config, GroupField, Overrides, ReportGroup};
pub use pipeline::RunContext;

// ============================================================================
// Top-level handle
// ============================================================================

/// A library source plus the means to turn it into a run.
pub struct Bibliography<S: LibrarySource> {
    source: S,
}

impl<S: LibrarySource> Bibliography<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Load the library from the source.
    pub fn fetch(&self) -> Result<Library> {
        tracing::info!(source = %self.source.describe(), "loading library");
        self.source.fetch()
    }

    /// Fetch the library and index it for one run.
    pub fn context(&self, config: Config) -> Result<RunContext> {
        RunContext::new(config, self.fetch()?)
    }
}

/// Already-loaded library, for tests and embedding.
impl Bibliography<MemorySource> {
    pub fn from_library(library: Library) -> Self {
        Self::with_source(MemorySource::new(library))
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid period {input:?}: {reason}")]
    PeriodParse { input: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Library {
        Library::new(
            vec![Item::new("I1").with_date("2020").in_collection("ROOT")],
            vec![Collection::new("ROOT", "1_Temperature")],
        )
    }

    #[test]
    fn test_fetch_returns_library() {
        let bib = Bibliography::from_library(library());
        assert_eq!(bib.fetch().unwrap(), library());
    }

    #[test]
    fn test_context_indexes_library() {
        let bib = Bibliography::from_library(library());
        let ctx = bib.context(Config::default()).unwrap();
        assert_eq!(ctx.items_in("ROOT").len(), 1);
        assert_eq!(ctx.tree().name("ROOT"), Some("1_Temperature"));
    }
}
