//! Query parameters of the three pages and the filtering they drive.

use std::cmp::Ordering;

use eyre::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::scrape::{Product, Review, Testimonial};
use crate::sentiment::Sentiment;
use crate::summary::{in_month, summarize, Month, SentimentSummary};

pub const DEFAULT_ROW_LIMIT: usize = 10;
pub const MIN_ROW_LIMIT: usize = 5;
pub const MAX_ROW_LIMIT: usize = 50;
pub const ROW_LIMIT_STEP: usize = 5;

/// Columns the product table can be sorted by.
pub const PRODUCT_COLUMNS: [&str; 6] = ["name", "description", "price", "page", "id", "source_url"];

#[derive(Deserialize, Debug, Default)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TestimonialQuery {
    pub q: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ReviewQuery {
    /// `2023-01` / `Jan 2023`; empty or `all` for every month.
    pub month: Option<String>,
    /// Rows to show.
    pub max: Option<usize>,
    /// `positive`, `negative`, a comma list of both, or `all`.
    pub sentiment: Option<String>,
}

fn needle(q: &Option<String>) -> Option<String> {
    q.as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Products whose name or description contains `q`, sorted by `sort`.
/// The sort is stable so ties keep their scrape order.
pub fn products_view(products: Vec<Product>, query: &ProductQuery) -> Vec<Product> {
    let mut rows = match needle(&query.q) {
        Some(q) => products
            .into_iter()
            .filter(|p| matches(&p.name, &q) || matches(&p.description, &q))
            .collect(),
        None => products,
    };

    let column = query.sort.as_deref().unwrap_or("name");
    match column {
        "name" => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        "description" => rows.sort_by(|a, b| a.description.cmp(&b.description)),
        "price" => rows.sort_by(|a, b| cmp_missing_last(a.price_value, b.price_value)),
        "page" => rows.sort_by_key(|p| p.page),
        "id" => rows.sort_by(|a, b| cmp_missing_last(a.id, b.id)),
        "source_url" => rows.sort_by(|a, b| a.source_url.cmp(&b.source_url)),
        _ => {}
    }
    rows
}

fn cmp_missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Testimonials whose author or text contains `q`.
pub fn testimonials_view(testimonials: Vec<Testimonial>, query: &TestimonialQuery) -> Vec<Testimonial> {
    match needle(&query.q) {
        Some(q) => testimonials
            .into_iter()
            .filter(|t| t.author.as_deref().is_some_and(|a| matches(a, &q)) || matches(&t.text, &q))
            .collect(),
        None => testimonials,
    }
}

impl ReviewQuery {
    pub fn month(&self) -> Result<Option<Month>> {
        match self.month.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(m) if m.eq_ignore_ascii_case("all") => Ok(None),
            Some(m) => Ok(Some(m.parse()?)),
        }
    }

    /// Requested row count, snapped to the slider's 5..=50 step 5.
    pub fn row_limit(&self) -> usize {
        let max = self.max.unwrap_or(DEFAULT_ROW_LIMIT);
        let snapped = (max / ROW_LIMIT_STEP) * ROW_LIMIT_STEP;
        snapped.clamp(MIN_ROW_LIMIT, MAX_ROW_LIMIT)
    }

    /// Sentiments to keep in the table. Empty means all.
    pub fn sentiments(&self) -> Result<Vec<Sentiment>> {
        let Some(raw) = self.sentiment.as_deref() else {
            return Ok(Vec::new());
        };
        let mut chosen = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.eq_ignore_ascii_case("all") {
                return Ok(Vec::new());
            }
            let sentiment = Sentiment::from_label(part)?;
            if !chosen.contains(&sentiment) {
                chosen.push(sentiment);
            }
        }
        Ok(chosen)
    }
}

/// Everything the reviews page shows.
#[derive(Serialize, Debug)]
pub struct ReviewsView {
    /// `None` when every month is shown.
    pub month: Option<String>,
    /// Aggregates over the month, before the sentiment filter.
    pub summary: SentimentSummary,
    /// Reviews in the month after the sentiment filter.
    pub matching: usize,
    pub row_limit: usize,
    /// Newest first, at most `row_limit`.
    pub rows: Vec<Review>,
}

/// Narrows `reviews` to the requested month. Sentiment must already be
/// attached for the summary to be complete.
pub fn reviews_in_scope(reviews: Vec<Review>, query: &ReviewQuery) -> Result<Vec<Review>> {
    Ok(match query.month()? {
        Some(month) => in_month(&reviews, month),
        None => reviews,
    })
}

pub fn reviews_view(scoped: Vec<Review>, query: &ReviewQuery) -> Result<ReviewsView> {
    let month = query.month()?;
    let summary = summarize(&scoped);

    let chosen = query.sentiments()?;
    let mut rows = scoped
        .into_iter()
        .filter(|r| chosen.is_empty() || r.sentiment.is_some_and(|s| chosen.contains(&s)))
        .collect::<Vec<_>>();
    // newest first, undated last
    rows.sort_by(|a, b| match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let matching = rows.len();
    let row_limit = query.row_limit();
    rows.truncate(row_limit);

    Ok(ReviewsView {
        month: month.map(|m| m.label()),
        summary,
        matching,
        row_limit,
        rows,
    })
}

/// Validates query parameters up front so a bad value is a 400, not a 500.
pub fn validate(query: &ReviewQuery) -> Result<()> {
    if let Err(err) = query.month() {
        bail!("invalid month: {err}");
    }
    if let Err(err) = query.sentiments() {
        bail!("invalid sentiment filter: {err}");
    }
    Ok(())
}
