//! In-memory source: hands out a clone of a library built elsewhere.

use crate::model::Library;
use crate::Result;
use super::LibrarySource;

pub struct MemorySource {
    library: Library,
}

impl MemorySource {
    pub fn new(library: Library) -> Self {
        Self { library }
    }
}

impl LibrarySource for MemorySource {
    fn describe(&self) -> String {
        format!(
            "memory ({} items, {} collections)",
            self.library.items.len(),
            self.library.collections.len()
        )
    }

    fn fetch(&self) -> Result<Library> {
        Ok(self.library.clone())
    }
}
