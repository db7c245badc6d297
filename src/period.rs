//! Period tags: `YYYY` or `YYYY-YYYY` year ranges.
//!
//! A period covers whole years: Jan 1 of the start year through Dec 31 of
//! the end year. Only ranges spanning 10 to 50 years are plotted; shorter
//! or longer ones are treated as noise.
//!
//! ```text
//! "#PER/2071-2100" ─► "2071-2100" ─► Period { 2071, 2100 } ─► (2071-01-01, 2100-12-31)
//! ```

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::Item;
use crate::normalize::{first_author, year, UniqueNames};
use crate::tags::TagRecord;
use crate::{Error, Result};

/// Shortest span (in years, inclusive) that is plotted.
pub const MIN_SPAN_YEARS: i32 = 10;
/// Longest span (in years, inclusive) that is plotted.
pub const MAX_SPAN_YEARS: i32 = 50;

/// A closed range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub start_year: i32,
    pub end_year: i32,
}

impl Period {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self> {
        if end_year < start_year {
            return Err(Error::PeriodParse {
                input: format!("{start_year}-{end_year}"),
                reason: "end year precedes start year".into(),
            });
        }
        Ok(Self { start_year, end_year })
    }

    /// Single-year period.
    pub fn year(year: i32) -> Self {
        Self { start_year: year, end_year: year }
    }

    pub fn is_range(&self) -> bool {
        self.start_year != self.end_year
    }

    /// Number of years covered, both ends included.
    pub fn span_years(&self) -> i32 {
        self.end_year - self.start_year + 1
    }

    /// True if the span is plausible enough to plot.
    pub fn is_valid(&self) -> bool {
        (MIN_SPAN_YEARS..=MAX_SPAN_YEARS).contains(&self.span_years())
    }

    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.end_year, 12, 31).unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_range() {
            write!(f, "{}-{}", self.start_year, self.end_year)
        } else {
            write!(f, "{}", self.start_year)
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        let malformed = |reason: &str| Error::PeriodParse {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        match input.split_once('-') {
            Some((start, end)) => {
                let start = parse_year(start).ok_or_else(|| malformed("start is not a 4-digit year"))?;
                let end = parse_year(end).ok_or_else(|| malformed("end is not a 4-digit year"))?;
                Period::new(start, end).map_err(|_| malformed("end year precedes start year"))
            }
            None => parse_year(input)
                .map(Period::year)
                .ok_or_else(|| malformed("expected YYYY or YYYY-YYYY")),
        }
    }
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Parse a period string into its first and last day.
pub fn parse_period(s: &str) -> Result<(NaiveDate, NaiveDate)> {
    let period: Period = s.parse()?;
    Ok((period.start_date(), period.end_date()))
}

/// True iff `s` parses and spans 10 to 50 years.
pub fn is_valid(s: &str) -> bool {
    s.parse::<Period>().map(|p| p.is_valid()).unwrap_or(false)
}

// ============================================================================
// Counting
// ============================================================================

/// Whether single-year period tags take part in frequency counts.
///
/// They are never plotted (a 1-year span is not valid), but counting them
/// changes the totals and the shading scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleYearPolicy {
    /// Only `YYYY-YYYY` strings are counted.
    #[default]
    Exclude,
    Include,
}

impl SingleYearPolicy {
    pub fn from_flag(include: bool) -> Self {
        if include { Self::Include } else { Self::Exclude }
    }
}

/// One plotted line of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    pub period: Period,
    pub count: u32,
}

impl TimelineRow {
    pub fn label(&self) -> String {
        format!("{} ({})", self.period, self.count)
    }
}

/// Usage frequency of each period across a set of items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodCounts {
    counts: BTreeMap<Period, u32>,
}

impl PeriodCounts {
    /// Count period strings. Malformed strings are logged and skipped.
    pub fn tally<'a, I>(values: I, policy: SingleYearPolicy) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = BTreeMap::new();
        for value in values {
            if policy == SingleYearPolicy::Exclude && !value.contains('-') {
                continue;
            }
            match value.parse::<Period>() {
                Ok(period) => *counts.entry(period).or_insert(0) += 1,
                Err(err) => warn!(%err, "skipping period tag"),
            }
        }
        Self { counts }
    }

    pub fn get(&self, period: &Period) -> u32 {
        self.counts.get(period).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Highest count over everything tallied, plotted or not.
    pub fn max_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Period, &u32)> {
        self.counts.iter()
    }

    /// Valid periods, earliest start first; among equal starts the longest first.
    pub fn timeline_rows(&self) -> Vec<TimelineRow> {
        let mut rows: Vec<TimelineRow> = self
            .counts
            .iter()
            .filter(|(period, _)| period.is_valid())
            .map(|(period, count)| TimelineRow { period: *period, count: *count })
            .collect();
        rows.sort_by_key(|row| (row.period.start_year, Reverse(row.period.end_year)));
        rows
    }
}

// ============================================================================
// Survey
// ============================================================================

/// Period values per item, keyed by a unique `"Author, Year"` name.
///
/// This is what gets cached between runs; counts are derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodSurvey {
    pub entries: BTreeMap<String, Vec<String>>,
}

impl PeriodSurvey {
    /// Collect the period tags (`#<category>/<period>`) of each item.
    ///
    /// Items are visited in the given order, which decides who gets the
    /// plain name when two items share author and year.
    pub fn collect<'a, I>(items: I, period_category: &str) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut names = UniqueNames::new();
        let mut entries = BTreeMap::new();
        for item in items {
            let name = names.claim(&format!("{}, {}", first_author(item), year(item)));
            entries.insert(name, period_values(item, period_category));
        }
        Self { entries }
    }

    pub fn load_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn counts(&self, policy: SingleYearPolicy) -> PeriodCounts {
        PeriodCounts::tally(
            self.entries.values().flatten().map(String::as_str),
            policy,
        )
    }
}

/// Subcategories of an item's tags in `period_category`.
pub fn period_values(item: &Item, period_category: &str) -> Vec<String> {
    item.data
        .tags
        .iter()
        .filter_map(|t| TagRecord::parse(&t.tag, String::new()))
        .filter(|r| r.category == period_category && !r.subcategory.is_empty())
        .map(|r| r.subcategory)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Creator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_period("1990-2010").unwrap(), (date(1990, 1, 1), date(2010, 12, 31)));
    }

    #[test]
    fn test_parse_single_year() {
        assert_eq!(parse_period("2005").unwrap(), (date(2005, 1, 1), date(2005, 12, 31)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!("  2071-2100 ".parse::<Period>().unwrap(), Period::new(2071, 2100).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "abcd", "199", "1990-", "1990-20100", "1.5-2", "1990/2010", "+1990"] {
            assert!(bad.parse::<Period>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let err = "2050-2020".parse::<Period>().unwrap_err();
        assert!(matches!(err, Error::PeriodParse { .. }));
    }

    #[test]
    fn test_validity_boundaries() {
        assert!(is_valid("2020-2050"));
        assert!(!is_valid("2020-2025"));
        assert!(!is_valid("2000-2060"));
        assert!(is_valid("2001-2010"));
        assert!(!is_valid("2001-2009"));
        assert!(is_valid("2001-2050"));
        assert!(!is_valid("2001-2051"));
        assert!(!is_valid("2005"));
        assert!(!is_valid("garbage"));
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(Period::new(1971, 2000).unwrap().to_string(), "1971-2000");
        assert_eq!(Period::year(2005).to_string(), "2005");
    }

    #[test]
    fn test_tally_excludes_single_years_by_default() {
        let values = ["2071-2100", "2071-2100", "2050", "2041-2060"];
        let counts = PeriodCounts::tally(values, SingleYearPolicy::Exclude);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&Period::new(2071, 2100).unwrap()), 2);
        assert_eq!(counts.get(&Period::year(2050)), 0);
    }

    #[test]
    fn test_tally_includes_single_years_when_asked() {
        let values = ["2050", "2050", "2050", "2071-2100"];
        let counts = PeriodCounts::tally(values, SingleYearPolicy::Include);
        assert_eq!(counts.get(&Period::year(2050)), 3);
        assert_eq!(counts.max_count(), 3);
        // Still not plotted.
        assert_eq!(counts.timeline_rows().len(), 1);
    }

    #[test]
    fn test_tally_skips_malformed() {
        let counts = PeriodCounts::tally(["1.5-2C", "2071-2100"], SingleYearPolicy::Exclude);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn test_timeline_order() {
        let values = ["2041-2060", "2031-2060", "2031-2050", "2001-2005", "1971-2000"];
        let rows = PeriodCounts::tally(values, SingleYearPolicy::Exclude).timeline_rows();
        let labels: Vec<String> = rows.iter().map(|r| r.period.to_string()).collect();
        assert_eq!(labels, vec!["1971-2000", "2031-2060", "2031-2050", "2041-2060"]);
    }

    #[test]
    fn test_survey_names_and_values() {
        let a = Item::new("A")
            .with_creator(Creator::person("Ana", "Perez"))
            .with_date("2020")
            .with_tag("#PER/ 2071-2100")
            .with_tag("#SCEN/rcp85");
        let b = Item::new("B")
            .with_creator(Creator::person("Ana", "Perez"))
            .with_date("2020-02")
            .with_tag("#PER/2041-2060");
        let survey = PeriodSurvey::collect([&a, &b], "PER");
        assert_eq!(survey.entries["Perez, 2020"], vec!["2071-2100"]);
        assert_eq!(survey.entries["Perez, 2020i"], vec!["2041-2060"]);
    }

    #[test]
    fn test_survey_json_round_trip() {
        let a = Item::new("A").with_date("2020").with_tag("#PER/2071-2100");
        let survey = PeriodSurvey::collect([&a], "PER");
        let reloaded = PeriodSurvey::load_json(&survey.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, survey);
    }
}
