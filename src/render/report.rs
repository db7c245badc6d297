//! Per-group item report.
//!
//! ```text
//! <h1 id="top">title</h1>
//! <nav> links to every section </nav>
//! <h2 id="anchor">Group/Sub</h2>
//! <table>
//!   Author (Year) Title        ← linked when the item has a URL
//!   Tags        | #A/b, #C/d
//!   Collections | Sub, Other
//!   Note        | <p>…</p>     ← zero or more
//! </table>
//! ```

use std::fmt::Write as _;

use crate::normalize::{NormalizedItem, UniqueNames};
use super::{html_escape, page_footer, page_header, plain_chars, PageOptions};

/// A child note shown under its parent item. `html` is inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub label: String,
    pub html: String,
}

/// One item row-group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub item: NormalizedItem,
    /// Human-readable collection names, sorted.
    pub collection_names: Vec<String>,
    pub notes: Vec<Note>,
}

/// One collection (or sub-collection) block of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    /// `Group/Sub/...`
    pub heading: String,
    /// Entries in report order.
    pub entries: Vec<ReportEntry>,
}

impl ReportSection {
    /// Anchor derived from the heading. Not unique on its own: `Fire risk`
    /// and `Fire_risk` map to the same string.
    pub fn anchor(&self) -> String {
        plain_chars(&self.heading)
    }
}

/// Section anchors, made unique within one page by appending `-`.
fn section_anchors(sections: &[ReportSection]) -> Vec<String> {
    let mut names = UniqueNames::with_suffix('-');
    sections.iter().map(|section| names.claim(&section.anchor())).collect()
}

pub fn render_report(page: &PageOptions, sections: &[ReportSection]) -> String {
    let anchors = section_anchors(sections);
    let mut out = page_header(page);
    out.push_str(&render_nav(sections, &anchors));
    for (section, anchor) in sections.iter().zip(&anchors) {
        out.push_str(&render_section(section, anchor));
    }
    out.push_str(page_footer());
    out
}

fn render_nav(sections: &[ReportSection], anchors: &[String]) -> String {
    let mut out = String::from("<nav>\n<ul>\n");
    for (section, anchor) in sections.iter().zip(anchors) {
        let _ = writeln!(
            out,
            "<li><a href=\"#{}\">{}</a> ({})</li>",
            html_escape(anchor),
            html_escape(&section.heading),
            section.entries.len(),
        );
    }
    out.push_str("</ul>\n</nav>\n");
    out
}

fn render_section(section: &ReportSection, anchor: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<h2 id=\"{}\">{} <a href=\"#top\">&uarr;</a></h2>",
        html_escape(anchor),
        html_escape(&section.heading),
    );
    out.push_str("<table>\n");
    for entry in &section.entries {
        out.push_str(&render_entry(entry));
    }
    out.push_str("</table>\n");
    out
}

fn render_entry(entry: &ReportEntry) -> String {
    let item = &entry.item;
    let citation = format!(
        "<b>{} ({})</b> {}",
        html_escape(&item.first_author),
        html_escape(&item.year),
        html_escape(&item.title),
    );
    let heading = match &item.url {
        Some(url) => format!("<a href=\"{}\">{citation}</a>", html_escape(url)),
        None => citation,
    };

    let mut out = String::new();
    let _ = writeln!(out, "<tr><td colspan=\"2\" class=\"item\">{heading}</td></tr>");
    let _ = writeln!(out, "<tr><td>Tags</td><td>{}</td></tr>", html_escape(&item.tags.join(", ")));
    let _ = writeln!(
        out,
        "<tr><td>Collections</td><td>{}</td></tr>",
        html_escape(&entry.collection_names.join(", ")),
    );
    for note in &entry.notes {
        let _ = writeln!(out, "<tr><td>{}</td><td>{}</td></tr>", html_escape(&note.label), note.html);
    }
    out
}
