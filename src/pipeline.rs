//! # Pipeline
//!
//! One run = one linear pass over an explicit [`RunContext`]:
//!
//! ```text
//!   Config + Library
//!        │
//!        ▼
//!   RunContext ── CollectionTree, SubcategoryMap
//!        │
//!        ├── run_reports     report-{name}.html
//!        ├── run_tag_tables  tag-table-{name}.html, tag-table-{name}-by-scenario.html
//!        ├── run_periods     periods-{name}.json (survey cache), periods-{name}.svg
//!        └── run_index       index.html
//! ```
//!
//! Every step writes through [`ArtifactWriter`], so files that already exist
//! are skipped and a step can be rerun after deleting single outputs.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use hashbrown::HashSet;
use tracing::{debug, info};

use crate::config::{expand, Config, GroupField, ReportGroup};
use crate::model::{Item, Library};
use crate::normalize::NormalizedItem;
use crate::output::{ArtifactWriter, RunSummary, WriteOutcome};
use crate::period::{PeriodSurvey, SingleYearPolicy};
use crate::render::{
    render_index, render_report, render_scenario_table, render_tag_table, render_timeline,
    IndexRow, Note, PageOptions, ReportEntry, ReportSection,
};
use crate::tags::{records_for, ScenarioTable, SubcategoryMap, TagRecord, TagTable};
use crate::tree::CollectionTree;
use crate::{Error, Result};

/// Row label of child notes in reports.
pub const NOTE_LABEL: &str = "Literal messages";

/// Everything a run needs, built once and borrowed by each step.
pub struct RunContext {
    config: Config,
    library: Library,
    tree: CollectionTree,
    subcategories: SubcategoryMap,
    generated_at: Option<NaiveDateTime>,
}

impl RunContext {
    pub fn new(config: Config, library: Library) -> Result<Self> {
        let tree = CollectionTree::new(&library.collections)?;
        let subcategories = SubcategoryMap::default().with_overrides(config.subcategory_map.clone());
        debug!(
            items = library.items.len(),
            collections = tree.len(),
            synonyms = subcategories.len(),
            "run context ready"
        );
        Ok(Self { config, library, tree, subcategories, generated_at: None })
    }

    /// Timestamp printed on pages when `config.timestamp` is set.
    pub fn with_generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn tree(&self) -> &CollectionTree {
        &self.tree
    }

    fn page(&self, title: impl Into<String>) -> PageOptions {
        let at = if self.config.timestamp { self.generated_at } else { None };
        PageOptions::new(title).generated_at(at)
    }

    /// Collection key of a configured group.
    pub fn resolve(&self, group: &ReportGroup) -> Result<String> {
        let key = match self.config.group_field {
            GroupField::Name => self.tree.find_by_name(&group.collection),
            GroupField::Key => Some(group.collection.as_str()).filter(|k| self.tree.contains(k)),
        };
        key.map(str::to_string)
            .ok_or_else(|| Error::NotFound(format!("collection {:?}", group.collection)))
    }

    fn group_title(&self, group: &ReportGroup, key: &str) -> String {
        group
            .title
            .clone()
            .unwrap_or_else(|| self.tree.name(key).unwrap_or(key).to_string())
    }

    /// Title of a group for pages that do not resolve it themselves: the
    /// configured title, else the collection name, else the configured value.
    pub fn display_title(&self, group: &ReportGroup) -> String {
        match self.resolve(group) {
            Ok(key) => self.group_title(group, &key),
            Err(_) => group.title.clone().unwrap_or_else(|| group.collection.clone()),
        }
    }

    /// Top-level items filed anywhere under `root_key`, once each, in library order.
    pub fn items_in(&self, root_key: &str) -> Vec<&Item> {
        let targets = self.tree.descendants(root_key);
        let mut seen = HashSet::new();
        self.library
            .items
            .iter()
            .filter(|item| item.is_top_level())
            .filter(|item| item.in_any(|c| targets.contains(c)))
            .filter(|item| seen.insert(item.key.as_str()))
            .collect()
    }

    /// One section per collection under `root_key`, depth first.
    pub fn report_sections(&self, root_key: &str) -> Vec<ReportSection> {
        self.tree
            .walk(root_key)
            .into_iter()
            .map(|node| {
                let mut entries: Vec<ReportEntry> = self
                    .library
                    .items
                    .iter()
                    .filter(|item| item.is_top_level() && item.in_any(|c| c == node.key))
                    .map(|item| self.report_entry(item))
                    .collect();
                entries.sort_by(|a, b| a.item.report_order(&b.item));
                ReportSection { heading: node.path, entries }
            })
            .collect()
    }

    fn report_entry(&self, item: &Item) -> ReportEntry {
        let notes = self
            .library
            .notes_for(&item.key)
            .filter_map(|note| note.data.note.clone())
            .map(|html| Note { label: NOTE_LABEL.into(), html })
            .collect();
        ReportEntry {
            item: NormalizedItem::from_item(item),
            collection_names: self.tree.names_for(&item.data.collections),
            notes,
        }
    }

    pub fn tag_records(&self, root_key: &str) -> Vec<TagRecord> {
        records_for(self.items_in(root_key), &self.subcategories)
    }

    pub fn period_survey(&self, root_key: &str) -> PeriodSurvey {
        PeriodSurvey::collect(self.items_in(root_key), &self.config.period_category)
    }
}

// ============================================================================
// Steps
// ============================================================================

pub fn run_reports(ctx: &RunContext, writer: &ArtifactWriter) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for group in &ctx.config.groups {
        let file_name = expand(&ctx.config.templates.report, &group.slug());
        let outcome = writer.write_if_absent(&file_name, || {
            let key = ctx.resolve(group)?;
            let sections = ctx.report_sections(&key);
            info!(group = %group.collection, sections = sections.len(), "report");
            let title = format!("{}. {}", ctx.config.title, ctx.group_title(group, &key));
            Ok(render_report(&ctx.page(title), &sections))
        })?;
        summary.record(outcome);
    }
    Ok(summary)
}

pub fn run_tag_tables(ctx: &RunContext, writer: &ArtifactWriter) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let templates = &ctx.config.templates;
    for group in &ctx.config.groups {
        let slug = group.slug();
        let plain = expand(&templates.tag_table, &slug);
        let pivoted = expand(&templates.scenario_table, &slug);
        if writer.is_built(&plain) && writer.is_built(&pivoted) {
            info!(group = %group.collection, "tag tables exist, skipping");
            summary.record(WriteOutcome::Skipped(writer.path_for(&plain)));
            summary.record(WriteOutcome::Skipped(writer.path_for(&pivoted)));
            continue;
        }

        let key = ctx.resolve(group)?;
        let records = ctx.tag_records(&key);
        debug!(
            group = %group.collection,
            records = records.len(),
            scenarios = scenarios(&records, &ctx.config.scenario_category).len(),
            "tag records"
        );
        let title = format!("{}. {}", ctx.config.title, ctx.group_title(group, &key));

        summary.record(writer.write_if_absent(&plain, || {
            Ok(render_tag_table(&ctx.page(format!("{title}: tags")), &TagTable::aggregate(&records)))
        })?);
        summary.record(writer.write_if_absent(&pivoted, || {
            let table = ScenarioTable::pivot(&records, &ctx.config.scenario_category);
            Ok(render_scenario_table(&ctx.page(format!("{title}: tags by scenario")), &table))
        })?);
    }
    Ok(summary)
}

pub fn run_periods(ctx: &RunContext, writer: &ArtifactWriter) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let templates = &ctx.config.templates;
    let policy = SingleYearPolicy::from_flag(ctx.config.include_single_year_periods);
    for target in &ctx.config.periods {
        let slug = target.slug();
        let cache_name = expand(&templates.survey, &slug);

        let survey = if writer.is_built(&cache_name) {
            let path = writer.path_for(&cache_name);
            info!(path = %path.display(), "reading period survey");
            let json = std::fs::read_to_string(&path)?;
            summary.record(WriteOutcome::Skipped(path));
            PeriodSurvey::load_json(&json)?
        } else {
            let key = ctx.resolve(target)?;
            let survey = ctx.period_survey(&key);
            summary.record(writer.write_if_absent(&cache_name, || survey.to_json())?);
            survey
        };

        let svg_name = expand(&templates.timeline, &slug);
        summary.record(writer.write_if_absent(&svg_name, || {
            let counts = survey.counts(policy);
            let rows = counts.timeline_rows();
            info!(periods = counts.len(), plotted = rows.len(), "period timeline");
            let title = ctx.display_title(target);
            Ok(render_timeline(&title, &rows, counts.max_count(), ctx.config.timeline))
        })?);
    }
    Ok(summary)
}

pub fn run_index(ctx: &RunContext, writer: &ArtifactWriter) -> Result<RunSummary> {
    let templates = &ctx.config.templates;
    let outcome = writer.write_if_absent(&templates.index, || {
        let rows: Vec<IndexRow> = ctx
            .config
            .groups
            .iter()
            .map(|group| {
                let slug = group.slug();
                IndexRow {
                    title: ctx.display_title(group),
                    report: expand(&templates.report, &slug),
                    tag_table: expand(&templates.tag_table, &slug),
                    scenario_table: expand(&templates.scenario_table, &slug),
                }
            })
            .collect();
        Ok(render_index(&ctx.page(ctx.config.title.clone()), &rows))
    })?;
    let mut summary = RunSummary::default();
    summary.record(outcome);
    Ok(summary)
}

/// Every step in order.
pub fn run_all(ctx: &RunContext, writer: &ArtifactWriter) -> Result<RunSummary> {
    let mut summary = run_reports(ctx, writer)?;
    summary.merge(run_tag_tables(ctx, writer)?);
    summary.merge(run_periods(ctx, writer)?);
    summary.merge(run_index(ctx, writer)?);
    Ok(summary)
}

/// `{library}_{YYYYmmdd_HHMM}.json`.
pub fn snapshot_file_name(library_name: &str, at: NaiveDateTime) -> String {
    let stem: String = library_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{stem}_{}.json", at.format("%Y%m%d_%H%M"))
}

/// Distinct values of `scenario_category` among `records`.
pub fn scenarios(records: &[TagRecord], scenario_category: &str) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| r.category == scenario_category)
        .map(|r| r.subcategory.clone())
        .collect()
}
