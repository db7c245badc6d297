//! Dump source: a library JSON document on disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::Library;
use crate::Result;
use super::LibrarySource;

pub struct DumpSource {
    path: PathBuf,
}

impl DumpSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LibrarySource for DumpSource {
    fn describe(&self) -> String {
        format!("dump {}", self.path.display())
    }

    fn fetch(&self) -> Result<Library> {
        let library = Library::load(&self.path)?;
        debug!(
            items = library.items.len(),
            collections = library.collections.len(),
            "loaded dump"
        );
        Ok(library)
    }
}
