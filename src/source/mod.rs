//! # Library Sources
//!
//! Where a run gets its `Library` from. Every source returns the same
//! interchange shape, so the rest of the pipeline cannot tell a live API
//! fetch from a dump file.
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `MemorySource` | `memory` | Already-loaded library (tests, embedding) |
//! | `DumpSource` | `dump` | `{"items", "collections"}` JSON file |
//! | `CachedSource` | `cache` | Wraps any source with a JSON cache file |
//! | `WebSource` | `web` | Zotero web API (feature `online`) |

pub mod memory;
pub mod dump;
pub mod cache;
#[cfg(feature = "online")]
pub mod web;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::Library;
use crate::Result;

pub use memory::MemorySource;
pub use dump::DumpSource;
pub use cache::CachedSource;
#[cfg(feature = "online")]
pub use web::WebSource;

/// Anything that can produce the library for one run.
pub trait LibrarySource {
    /// Short description for log lines.
    fn describe(&self) -> String;

    /// Fetch every item and collection.
    fn fetch(&self) -> Result<Library>;
}

impl<S: LibrarySource + ?Sized> LibrarySource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self) -> Result<Library> {
        (**self).fetch()
    }
}

// ============================================================================
// Source configuration
// ============================================================================

/// Which source to open, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Offline: a library dump on disk.
    Dump { path: PathBuf },

    /// Online: the Zotero web API.
    Web {
        /// `group` or `user`.
        #[serde(default = "default_library_type")]
        library_type: String,
        library_id: String,
        /// Falls back to the `ZOTERO_API_KEY` environment variable.
        #[serde(default)]
        api_key: Option<String>,
        /// Cache file; fetched once, then read from disk.
        #[serde(default)]
        cache: Option<PathBuf>,
    },
}

fn default_library_type() -> String {
    "group".into()
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Dump { path: PathBuf::from("library.json") }
    }
}

/// Open the source described by `config`.
pub fn open(config: &SourceConfig) -> Result<Box<dyn LibrarySource>> {
    match config {
        SourceConfig::Dump { path } => Ok(Box::new(DumpSource::new(path.clone()))),
        #[cfg(feature = "online")]
        SourceConfig::Web { library_type, library_id, api_key, cache } => {
            let api_key = match api_key {
                Some(key) => Some(key.clone()),
                None => std::env::var("ZOTERO_API_KEY").ok(),
            };
            let web = WebSource::new(library_type, library_id, api_key)?;
            Ok(match cache {
                Some(path) => Box::new(CachedSource::new(web, path.clone())),
                None => Box::new(web),
            })
        }
        #[cfg(not(feature = "online"))]
        SourceConfig::Web { .. } => Err(crate::Error::Config(
            "web source requires building with the `online` feature".into(),
        )),
    }
}
