//! Artifact writer with build-cache semantics for generated files.
//!
//! An output file that already exists counts as built and is left alone;
//! its content closure is never evaluated. Delete the file (or pass
//! `force`) to rebuild it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::Result;

/// What happened to one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    Skipped(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(p) | WriteOutcome::Skipped(p) => p,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, WriteOutcome::Written(_))
    }
}

/// Tally of a run, for the final log line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written(p) => self.written.push(p),
            WriteOutcome::Skipped(p) => self.skipped.push(p),
        }
    }

    pub fn merge(&mut self, other: RunSummary) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
    }
}

/// Writes files under one output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    out_dir: PathBuf,
    force: bool,
}

impl ArtifactWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into(), force: false }
    }

    /// Overwrite existing files instead of skipping them.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.out_dir.join(file_name)
    }

    /// True if `file_name` would be skipped.
    pub fn is_built(&self, file_name: &str) -> bool {
        !self.force && self.path_for(file_name).exists()
    }

    /// Write `file_name` unless it already exists.
    pub fn write_if_absent<F>(&self, file_name: &str, render: F) -> Result<WriteOutcome>
    where
        F: FnOnce() -> Result<String>,
    {
        let path = self.path_for(file_name);
        if self.is_built(file_name) {
            info!(path = %path.display(), "exists, skipping");
            return Ok(WriteOutcome::Skipped(path));
        }
        let contents = render()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        info!(path = %path.display(), "written");
        Ok(WriteOutcome::Written(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_write_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let first = writer.write_if_absent("a.html", || Ok("one".into())).unwrap();
        assert!(first.was_written());

        let second = writer
            .write_if_absent("a.html", || panic!("must not render an existing artifact"))
            .unwrap();
        assert_eq!(second, WriteOutcome::Skipped(dir.path().join("a.html")));
        assert_eq!(fs::read_to_string(dir.path().join("a.html")).unwrap(), "one");
    }

    #[test]
    fn test_force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path()).force(true);
        writer.write_if_absent("a.html", || Ok("one".into())).unwrap();
        writer.write_if_absent("a.html", || Ok("two".into())).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.html")).unwrap(), "two");
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path().join("docs"));
        let outcome = writer.write_if_absent("index.html", || Ok("x".into())).unwrap();
        assert!(outcome.path().exists());
    }

    #[test]
    fn test_render_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let result = writer.write_if_absent("a.html", || Err(crate::Error::Config("boom".into())));
        assert!(result.is_err());
        assert!(!dir.path().join("a.html").exists());
    }
}
