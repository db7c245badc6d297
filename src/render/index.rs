//! Index page linking every group's documents.

use std::fmt::Write as _;

use super::{html_escape, page_footer, page_header, PageOptions};

/// One group's row: its title and the file names of its three documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub title: String,
    pub report: String,
    pub tag_table: String,
    pub scenario_table: String,
}

pub fn render_index(page: &PageOptions, rows: &[IndexRow]) -> String {
    let mut out = page_header(page);
    out.push_str("<table>\n");
    for row in rows {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td><a href=\"{}\">Report</a></td><td><a href=\"{}\">Tags</a></td><td><a href=\"{}\">Tags by scenario</a></td></tr>",
            html_escape(&row.title),
            html_escape(&row.report),
            html_escape(&row.tag_table),
            html_escape(&row.scenario_table),
        );
    }
    out.push_str("</table>\n");
    out.push_str(page_footer());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_row_per_group() {
        let rows = vec![
            IndexRow {
                title: "1_Temperature".into(),
                report: "report-temperature.html".into(),
                tag_table: "tag-table-temperature.html".into(),
                scenario_table: "tag-table-temperature-by-scenario.html".into(),
            },
            IndexRow {
                title: "3_Wind".into(),
                report: "report-wind.html".into(),
                tag_table: "tag-table-wind.html".into(),
                scenario_table: "tag-table-wind-by-scenario.html".into(),
            },
        ];
        let html = render_index(&PageOptions::new("References"), &rows);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.contains("<a href=\"tag-table-wind-by-scenario.html\">Tags by scenario</a>"));
    }
}
