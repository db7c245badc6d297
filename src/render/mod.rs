//! # Static Output Rendering
//!
//! Pure functions from aggregated data to document text. Nothing in this
//! module touches the filesystem; `output::ArtifactWriter` decides whether
//! a rendered document gets written.
//!
//! | Document | Function |
//! |----------|----------|
//! | Per-group item report | `report::render_report` |
//! | Category × subcategory table | `tag_table::render_tag_table` |
//! | Scenario-pivoted table | `tag_table::render_scenario_table` |
//! | Index page | `index::render_index` |
//! | Period timeline (SVG) | `timeline::render_timeline` |

pub mod report;
pub mod tag_table;
pub mod index;
pub mod timeline;

use std::fmt::Write as _;

use chrono::NaiveDateTime;

pub use report::{render_report, Note, ReportEntry, ReportSection};
pub use tag_table::{render_scenario_table, render_tag_table};
pub use index::{render_index, IndexRow};
pub use timeline::{render_timeline, TimelineWindow};

/// Page-level settings shared by every HTML document of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    pub title: String,
    /// Printed under the title. `None` keeps output byte-for-byte stable.
    pub generated_at: Option<NaiveDateTime>,
}

impl PageOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), generated_at: None }
    }

    pub fn generated_at(mut self, at: Option<NaiveDateTime>) -> Self {
        self.generated_at = at;
        self
    }
}

const STYLE: &str = "\
  table, th, td {font-size:10pt; border:1px solid black; border-collapse:collapse; text-align:left;}
  th, td {padding: 5px; vertical-align: top;}
  td.keys {min-width: 160px;}
  td.item {border-left: 1px solid white; border-right: 1px solid white; padding-top: 15px;}
  h2 { padding-top: 20px; padding-bottom: 0px; }
  a { text-decoration: none; color: #3399ff;}
  nav ul {columns: 2;}
";

/// Document head, `<h1 id="top">` and the optional timestamp.
pub(crate) fn page_header(page: &PageOptions) -> String {
    let mut out = String::new();
    let title = html_escape(&page.title);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n<h1 id=\"top\">{title}</h1>\n"
    );
    if let Some(at) = page.generated_at {
        let _ = writeln!(out, "<p>({})</p>", at.format("%Y-%m-%d %H:%M"));
    }
    out
}

pub(crate) fn page_footer() -> &'static str {
    "</body>\n</html>\n"
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Lowercase, with `/`, space and `_` turned into `-`. Used for anchors and
/// default file-name slugs.
pub fn plain_chars(s: &str) -> String {
    s.replace(['/', ' ', '_'], "-").to_lowercase()
}
