//! JSON cache around another source.
//!
//! If the cache file exists the wrapped source is never called. Otherwise
//! the library is fetched once and written to the cache for the next run.
//! There is no invalidation: delete the file to refetch.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::Library;
use crate::Result;
use super::LibrarySource;

pub struct CachedSource<S> {
    inner: S,
    cache_path: PathBuf,
}

impl<S: LibrarySource> CachedSource<S> {
    pub fn new(inner: S, cache_path: impl Into<PathBuf>) -> Self {
        Self { inner, cache_path: cache_path.into() }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

impl<S: LibrarySource> LibrarySource for CachedSource<S> {
    fn describe(&self) -> String {
        format!("{} (cache {})", self.inner.describe(), self.cache_path.display())
    }

    fn fetch(&self) -> Result<Library> {
        if self.cache_path.exists() {
            info!(path = %self.cache_path.display(), "reading cached library");
            return Library::load(&self.cache_path);
        }
        let library = self.inner.fetch()?;
        if let Some(parent) = self.cache_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        library.save(&self.cache_path)?;
        info!(path = %self.cache_path.display(), "cached library");
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use crate::model::Item;

    struct Counting {
        calls: Cell<u32>,
    }

    impl LibrarySource for Counting {
        fn describe(&self) -> String {
            "counting".into()
        }

        fn fetch(&self) -> Result<Library> {
            self.calls.set(self.calls.get() + 1);
            Ok(Library::new(vec![Item::new("A")], vec![]))
        }
    }

    #[test]
    fn test_fetches_once_then_reads_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache").join("lib.json");
        let source = CachedSource::new(Counting { calls: Cell::new(0) }, &cache);

        let first = source.fetch().unwrap();
        let second = source.fetch().unwrap();

        assert_eq!(first, second);
        assert_eq!(source.inner.calls.get(), 1);
        assert!(cache.exists());
    }
}
