//! Aggregates shown above the review table, and the month filter they are
//! computed over.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use eyre::{bail, eyre, Report, Result};
use serde::Serialize;

use crate::scrape::Review;
use crate::sentiment::Sentiment;

/// Year the dashboard's month selector covers.
pub const REPORT_YEAR: i32 = 2023;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    /// Reviews still without a label. Zero once the classifier has run.
    pub unscored: usize,
    /// Arithmetic mean of the confidences; `None` when nothing is scored.
    pub mean_confidence: Option<f64>,
}

pub fn summarize(reviews: &[Review]) -> SentimentSummary {
    let mut summary = SentimentSummary {
        total: reviews.len(),
        ..Default::default()
    };
    let mut confidence_sum = 0.0;
    let mut confidence_count = 0usize;

    for review in reviews {
        match review.sentiment {
            Some(Sentiment::Positive) => summary.positive += 1,
            Some(Sentiment::Negative) => summary.negative += 1,
            None => summary.unscored += 1,
        }
        if let Some(confidence) = review.confidence {
            confidence_sum += confidence;
            confidence_count += 1;
        }
    }

    if confidence_count > 0 {
        summary.mean_confidence = Some(confidence_sum / confidence_count as f64);
    }
    summary
}

/// A calendar month, written `2023-01` in URLs and `Jan 2023` on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("month {month} out of range");
        }
        Ok(Month { year, month })
    }

    /// `Jan 2023`.
    pub fn label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }

    /// `2023-01`.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Month {
    type Err = Report;

    /// Accepts `2023-01` or `Jan 2023`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((year, month)) = s.split_once('-') {
            let year = year.parse().map_err(|_| eyre!("bad year in {s:?}"))?;
            let month = month.parse().map_err(|_| eyre!("bad month in {s:?}"))?;
            return Month::new(year, month);
        }
        let date = NaiveDate::parse_from_str(&format!("01 {s}"), "%d %b %Y")
            .map_err(|_| eyre!("unrecognised month {s:?}"))?;
        Month::new(date.year(), date.month())
    }
}

/// The twelve months of [`REPORT_YEAR`].
pub fn report_months() -> Vec<Month> {
    (1..=12)
        .map(|month| Month {
            year: REPORT_YEAR,
            month,
        })
        .collect()
}

/// Reviews dated within `month`. Undated reviews never match.
pub fn in_month(reviews: &[Review], month: Month) -> Vec<Review> {
    reviews
        .iter()
        .filter(|r| r.date.is_some_and(|d| month.contains(d)))
        .cloned()
        .collect()
}
