//! Period timeline as a standalone SVG.
//!
//! One horizontal line per period, top to bottom in the order given. The
//! x-axis covers a fixed date window with a tick every ten years. Line
//! grey level encodes usage: the most used period is darkest.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::period::TimelineRow;
use super::html_escape;

const LABEL_WIDTH: f64 = 150.0;
const PLOT_WIDTH: f64 = 760.0;
const RIGHT_MARGIN: f64 = 20.0;
const TOP_MARGIN: f64 = 40.0;
const ROW_HEIGHT: f64 = 18.0;
const AXIS_HEIGHT: f64 = 30.0;
const LINE_WIDTH: f64 = 6.0;
const TICK_YEARS: i32 = 10;

/// Visible date range of the x-axis, in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineWindow {
    /// Jan 1 of this year is the left edge.
    pub start_year: i32,
    /// Jan 1 of this year is the right edge.
    pub end_year: i32,
}

impl Default for TimelineWindow {
    fn default() -> Self {
        Self { start_year: 1950, end_year: 2102 }
    }
}

impl TimelineWindow {
    fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    fn end(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.end_year, 1, 1).unwrap_or(NaiveDate::MAX)
    }

    /// Horizontal position of `date`, clamped to the window.
    fn x(&self, date: NaiveDate) -> f64 {
        let total = (self.end() - self.start()).num_days().max(1) as f64;
        let offset = (date - self.start()).num_days() as f64;
        LABEL_WIDTH + PLOT_WIDTH * (offset / total).clamp(0.0, 1.0)
    }

    /// Years divisible by ten inside the window.
    fn ticks(&self) -> impl Iterator<Item = i32> {
        let first = self.start_year + (TICK_YEARS - self.start_year.rem_euclid(TICK_YEARS)) % TICK_YEARS;
        let last = self.end_year;
        (first..=last).step_by(TICK_YEARS as usize)
    }
}

/// Grey component (0 = black, 255 = white) for a usage count.
///
/// `1 − (0.2 + 0.8 · count / max)`: the most used period is black, the
/// least used stays visible at no lighter than 80 % white.
pub fn grey_level(count: u32, max_count: u32) -> u8 {
    if max_count == 0 {
        return 255;
    }
    let share = f64::from(count.min(max_count)) / f64::from(max_count);
    let intensity = 1.0 - (0.2 + 0.8 * share);
    (intensity * 255.0).round() as u8
}

pub fn render_timeline(title: &str, rows: &[TimelineRow], max_count: u32, window: TimelineWindow) -> String {
    let width = LABEL_WIDTH + PLOT_WIDTH + RIGHT_MARGIN;
    let plot_bottom = TOP_MARGIN + ROW_HEIGHT * rows.len().max(1) as f64;
    let height = plot_bottom + AXIS_HEIGHT;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\" font-family=\"sans-serif\" font-size=\"10\">"
    );
    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"20\" font-size=\"13\" text-anchor=\"middle\">{}</text>",
        LABEL_WIDTH + PLOT_WIDTH / 2.0,
        html_escape(title),
    );

    // Decade grid and labels.
    for year in window.ticks() {
        let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) else { continue };
        let x = window.x(date);
        let _ = writeln!(
            out,
            "<line x1=\"{x:.1}\" y1=\"{TOP_MARGIN:.1}\" x2=\"{x:.1}\" y2=\"{plot_bottom:.1}\" stroke=\"#dddddd\" stroke-width=\"1\"/>"
        );
        let _ = writeln!(
            out,
            "<text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
            plot_bottom + 15.0,
            date.year(),
        );
    }
    let _ = writeln!(
        out,
        "<line x1=\"{LABEL_WIDTH:.1}\" y1=\"{plot_bottom:.1}\" x2=\"{:.1}\" y2=\"{plot_bottom:.1}\" stroke=\"black\" stroke-width=\"1\"/>",
        LABEL_WIDTH + PLOT_WIDTH,
    );

    for (index, row) in rows.iter().enumerate() {
        let y = TOP_MARGIN + ROW_HEIGHT * (index as f64 + 0.5);
        let grey = grey_level(row.count, max_count);
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>",
            LABEL_WIDTH - 8.0,
            y + 3.5,
            html_escape(&row.label()),
        );
        let _ = writeln!(
            out,
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"rgb({grey},{grey},{grey})\" stroke-width=\"{LINE_WIDTH:.0}\"/>",
            window.x(row.period.start_date()),
            window.x(row.period.end_date()),
        );
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{PeriodCounts, SingleYearPolicy};

    #[test]
    fn test_grey_levels() {
        assert_eq!(grey_level(10, 10), 0);
        assert_eq!(grey_level(0, 10), 204);
        assert!(grey_level(2, 10) > grey_level(8, 10));
        assert_eq!(grey_level(3, 0), 255);
    }

    #[test]
    fn test_decade_ticks() {
        let ticks: Vec<i32> = TimelineWindow::default().ticks().collect();
        assert_eq!(ticks.first(), Some(&1950));
        assert_eq!(ticks.last(), Some(&2100));
        assert_eq!(ticks.len(), 16);

        let odd = TimelineWindow { start_year: 1953, end_year: 1990 };
        assert_eq!(odd.ticks().collect::<Vec<_>>(), vec![1960, 1970, 1980, 1990]);
    }

    #[test]
    fn test_x_is_clamped_to_window() {
        let w = TimelineWindow::default();
        let before = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2300, 1, 1).unwrap();
        assert_eq!(w.x(before), LABEL_WIDTH);
        assert_eq!(w.x(after), LABEL_WIDTH + PLOT_WIDTH);
    }

    #[test]
    fn test_one_line_per_row_in_order() {
        let counts = PeriodCounts::tally(
            ["2071-2100", "2071-2100", "1971-2000", "2041-2060"],
            SingleYearPolicy::Exclude,
        );
        let rows = counts.timeline_rows();
        let svg = render_timeline("Periods", &rows, counts.max_count(), TimelineWindow::default());
        let labels: Vec<usize> = ["1971-2000 (1)", "2041-2060 (1)", "2071-2100 (2)"]
            .iter()
            .map(|l| svg.find(l).expect("label present"))
            .collect();
        assert!(labels.windows(2).all(|w| w[0] < w[1]));
        assert!(svg.contains("stroke=\"rgb(0,0,0)\""));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
    }
}
