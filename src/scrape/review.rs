use chrono::NaiveDate;
use eyre::Result;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Site;
use crate::sentiment::Sentiment;
use crate::text::{clean, element_text, find_iso_date, parse_date, prefix, strip_iso_dates};

/// Reviews shorter than this are layout noise, not reviews.
const MIN_REVIEW_LEN: usize = 5;

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
/// A customer review. `sentiment` and `confidence` are filled in by the
/// classifier and absent in freshly scraped files.
pub struct Review {
    /// Review date, if the card carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Review body. Never empty.
    #[serde(alias = "review_text")]
    pub text: String,
    /// Star rating, if shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Extracts every dated review card on the page.
pub fn extract_reviews(html: &str, url: &Url) -> Vec<Review> {
    let card_selector =
        &Selector::parse("div.review, div[class*='review'], div.card, article, li").unwrap();
    let p_selector = &Selector::parse("p").unwrap();

    let document = Html::parse_document(html);

    let has_date = |card: ElementRef| review_date(card).is_some();
    let has_body = |card: ElementRef| longest_paragraph(card, p_selector).is_some();

    let reviews = super::innermost_cards(
        document.select(card_selector),
        card_selector,
        has_date,
        has_body,
    )
    .filter_map(|card| {
        let date = review_date(card)?;

        let text = longest_paragraph(card, p_selector)
            .unwrap_or_else(|| clean(&strip_iso_dates(&element_text(card))));
        if text.chars().count() < MIN_REVIEW_LEN {
            return None;
        }

        Some(Review {
            date: Some(date),
            text,
            rating: star_rating(card),
            source_url: url.to_string(),
            ..Default::default()
        })
    })
    .collect::<Vec<_>>();

    super::dedup_by_key(reviews, review_key)
}

/// The longest paragraph that is not the date line.
fn longest_paragraph(card: ElementRef, p_selector: &Selector) -> Option<String> {
    card.select(p_selector)
        .map(element_text)
        .filter(|p| !p.is_empty() && find_iso_date(p).is_none())
        .max_by_key(|p| p.chars().count())
}

/// An ISO date anywhere in the card, else a written-out date in a
/// `<time>` or `*date*` element.
fn review_date(card: ElementRef) -> Option<NaiveDate> {
    let date_selector = &Selector::parse("time, [class*='date']").unwrap();
    find_iso_date(&element_text(card)).or_else(|| {
        card.select(date_selector).find_map(|el| {
            el.value()
                .attr("datetime")
                .and_then(parse_date)
                .or_else(|| parse_date(&element_text(el)))
        })
    })
}

fn review_key(review: &Review) -> (Option<NaiveDate>, String) {
    (review.date, prefix(&review.text, 80).to_owned())
}

/// Counts the star icons inside a rating block, or reads a `data-rating`
/// attribute when the site provides one.
pub(crate) fn star_rating(card: ElementRef) -> Option<u8> {
    let rating_selector =
        &Selector::parse("[data-rating], [class*='rating'], [class*='stars']").unwrap();
    let star_selector = &Selector::parse("svg, [class*='star']").unwrap();

    let block = card.select(rating_selector).next()?;
    if let Some(value) = block.value().attr("data-rating") {
        return value.trim().parse::<f32>().ok().map(|v| v.round() as u8);
    }
    let stars = block.select(star_selector).count();
    (stars > 0).then(|| stars.min(u8::MAX as usize) as u8)
}

/// Loads `/reviews` and then follows `?page=N` until nothing new appears.
pub async fn scrape_reviews(client: &Client, site: &Site, max_pages: u32) -> Result<Vec<Review>> {
    super::paginate(
        client,
        max_pages,
        |page| site.reviews_page(page),
        |html, _, url| extract_reviews(html, url),
        review_key,
    )
    .await
}
