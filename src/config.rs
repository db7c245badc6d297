//! Run configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) is a valid configuration that reads `library.json` and writes to
//! `docs/`.
//!
//! ```toml
//! title = "CLIVAR 2024. Chapter 5"
//! output_dir = "docs"
//! group_field = "name"
//!
//! [source]
//! kind = "dump"
//! path = "library.json"
//!
//! [[groups]]
//! collection = "1_Temperature"
//! slug = "temperature"
//!
//! [[periods]]
//! collection = "3_Variables"
//! slug = "variables"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::{plain_chars, TimelineWindow};
use crate::source::SourceConfig;
use crate::tags::{PERIOD_CATEGORY, SCENARIO_CATEGORY};
use crate::{Error, Result};

/// How `groups[].collection` and `periods[].collection` name a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    /// Collection display name, e.g. `1_Temperature`.
    #[default]
    Name,
    /// Collection key, e.g. `T7N74W2T`.
    Key,
}

/// One report group: a collection and everything beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportGroup {
    pub collection: String,
    /// File-name stem; defaults to `plain_chars(collection)`.
    #[serde(default)]
    pub slug: Option<String>,
    /// Page title; defaults to the collection name.
    #[serde(default)]
    pub title: Option<String>,
}

impl ReportGroup {
    pub fn new(collection: impl Into<String>) -> Self {
        Self { collection: collection.into(), slug: None, title: None }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| plain_chars(&self.collection))
    }
}

/// File-name templates. `{name}` is replaced with the group slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputTemplates {
    pub report: String,
    pub tag_table: String,
    pub scenario_table: String,
    pub index: String,
    pub timeline: String,
    pub survey: String,
}

impl Default for OutputTemplates {
    fn default() -> Self {
        Self {
            report: "report-{name}.html".into(),
            tag_table: "tag-table-{name}.html".into(),
            scenario_table: "tag-table-{name}-by-scenario.html".into(),
            index: "index.html".into(),
            timeline: "periods-{name}.svg".into(),
            survey: "periods-{name}.json".into(),
        }
    }
}

/// Substitute `{name}` in a template.
pub fn expand(template: &str, name: &str) -> String {
    template.replace("{name}", name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title of the index page, and prefix of every other page title.
    pub title: String,
    pub output_dir: PathBuf,
    pub group_field: GroupField,
    pub scenario_category: String,
    pub period_category: String,
    /// Count bare `YYYY` period tags. They are never plotted either way.
    pub include_single_year_periods: bool,
    /// Print the generation time under each page title.
    pub timestamp: bool,
    pub templates: OutputTemplates,
    pub source: SourceConfig,
    /// Extra or replacement subcategory synonyms, applied over the built-in table.
    pub subcategory_map: BTreeMap<String, String>,
    pub timeline: TimelineWindow,
    pub groups: Vec<ReportGroup>,
    /// Collections to draw period timelines for.
    pub periods: Vec<ReportGroup>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "References".into(),
            output_dir: PathBuf::from("docs"),
            group_field: GroupField::default(),
            scenario_category: SCENARIO_CATEGORY.into(),
            period_category: PERIOD_CATEGORY.into(),
            include_single_year_periods: false,
            timestamp: true,
            templates: OutputTemplates::default(),
            source: SourceConfig::default(),
            subcategory_map: BTreeMap::new(),
            timeline: TimelineWindow::default(),
            groups: Vec::new(),
            periods: Vec::new(),
        }
    }
}

/// Command-line settings that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Read this dump instead of the configured source.
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub no_timestamp: bool,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// `explicit` if given, else `fallback` when it exists, else defaults.
    pub fn discover(explicit: Option<&Path>, fallback: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if fallback.exists() => Self::load(fallback),
            None => Ok(Self::default()),
        }
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(input) = &overrides.input {
            self.source = SourceConfig::Dump { path: input.clone() };
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.output_dir = output_dir.clone();
        }
        if overrides.no_timestamp {
            self.timestamp = false;
        }
        self
    }

    /// Checks that cannot be expressed in the serde schema.
    pub fn validate(&self) -> Result<()> {
        if self.scenario_category.is_empty() || self.period_category.is_empty() {
            return Err(Error::Config("tag categories must not be empty".into()));
        }
        if self.timeline.end_year <= self.timeline.start_year {
            return Err(Error::Config(format!(
                "timeline window {}..{} is empty",
                self.timeline.start_year, self.timeline.end_year
            )));
        }
        for (what, groups) in [("groups", &self.groups), ("periods", &self.periods)] {
            let mut slugs = BTreeSet::new();
            for group in groups {
                let slug = group.slug();
                if slug.is_empty() {
                    return Err(Error::Config(format!("{what}: empty slug for {:?}", group.collection)));
                }
                if !slugs.insert(slug.clone()) {
                    return Err(Error::Config(format!("{what}: duplicate slug {slug:?}")));
                }
            }
        }
        Ok(())
    }
}
