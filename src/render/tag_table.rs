//! Tag cross-tabulation pages.
//!
//! Each cell lists its citation keys, escaped and joined with `<br>`.
//! The category column spans all of its subcategory rows.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::tags::table::RowKey;
use crate::tags::{ScenarioTable, TagTable, CELL_SEPARATOR};
use super::{html_escape, page_footer, page_header, PageOptions};

type GridRow<'a> = (&'a RowKey, &'a [BTreeSet<String>]);

/// Category/subcategory × citation keys.
pub fn render_tag_table(page: &PageOptions, table: &TagTable) -> String {
    let rows: Vec<GridRow<'_>> = table
        .rows()
        .map(|(row, keys)| (row, std::slice::from_ref(keys)))
        .collect();
    let mut out = page_header(page);
    out.push_str(&render_grid(&["References".to_string()], &rows));
    out.push_str(page_footer());
    out
}

/// Category/subcategory × one column per scenario.
pub fn render_scenario_table(page: &PageOptions, table: &ScenarioTable) -> String {
    let rows: Vec<GridRow<'_>> = table.rows().collect();
    let mut out = page_header(page);
    if table.scenarios().is_empty() {
        out.push_str("<p>No scenario tags in this group.</p>\n");
    } else {
        out.push_str(&render_grid(table.scenarios(), &rows));
    }
    out.push_str(page_footer());
    out
}

fn render_cell(keys: &BTreeSet<String>) -> String {
    keys.iter()
        .map(|key| html_escape(key))
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

fn render_grid(columns: &[String], rows: &[GridRow<'_>]) -> String {
    let mut out = String::from("<table>\n<thead>\n<tr><th>Category</th><th>Subcategory</th>");
    for column in columns {
        let _ = write!(out, "<th>{}</th>", html_escape(column));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for (index, ((category, subcategory), cells)) in rows.iter().enumerate() {
        out.push_str("<tr>");
        let starts_category = index == 0 || rows[index - 1].0.0 != *category;
        if starts_category {
            let span = rows[index..].iter().take_while(|(row, _)| row.0 == *category).count();
            let _ = write!(out, "<th rowspan=\"{span}\">{}</th>", html_escape(category));
        }
        let _ = write!(out, "<th>{}</th>", html_escape(subcategory));
        for keys in cells.iter() {
            let _ = write!(out, "<td class=\"keys\">{}</td>", render_cell(keys));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}
