//! Fetching and extracting the three collections.
//!
//! Every category is walked page by page. A page that adds no record not
//! already seen ends the walk, as does a non-success status on any page after
//! the first. The first page must load or the category fails.

mod product;
mod review;
mod testimonial;

use std::collections::HashSet;
use std::hash::Hash;

use eyre::Result;
use log::{debug, info};
use reqwest::Client;
use scraper::{ElementRef, Selector};
use url::Url;

use crate::fetch::{fetch_html, fetch_page, Page};

pub use product::{extract_products, scrape_products, Product};
pub use review::{extract_reviews, scrape_reviews, Review};
pub use testimonial::{extract_testimonials, scrape_testimonials, Testimonial};

/// Walks pages `1..=max_pages`, keeping records whose key has not been seen.
async fn paginate<T, K>(
    client: &Client,
    max_pages: u32,
    page_url: impl Fn(u32) -> Result<Url>,
    extract: impl Fn(&str, u32, &Url) -> Vec<T>,
    key: impl Fn(&T) -> K,
) -> Result<Vec<T>>
where
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for page in 1..=max_pages {
        let url = page_url(page)?;
        let body = if page == 1 {
            fetch_html(client, &url).await?
        } else {
            match fetch_page(client, &url).await? {
                Page::Html(body) => body,
                Page::End(status) => {
                    debug!("stopping at {url}: {status}");
                    break;
                }
            }
        };

        let before = records.len();
        for record in extract(&body, page, &url) {
            if seen.insert(key(&record)) {
                records.push(record);
            }
        }
        let added = records.len() - before;
        info!("{url}: {added} new");
        if added == 0 {
            break;
        }
    }

    Ok(records)
}

/// Elements matching `cards` that pass `qualifies`, preferring the innermost
/// match. A nested match only stands in for its enclosing card when it is
/// also `complete`, so a wrapper such as `div.products` is skipped while a
/// header div inside a review does not replace the review.
fn innermost_cards<'a, Q, C>(
    root: impl Iterator<Item = ElementRef<'a>>,
    cards: &'a Selector,
    qualifies: Q,
    complete: C,
) -> impl Iterator<Item = ElementRef<'a>>
where
    Q: Fn(ElementRef<'a>) -> bool + Copy + 'a,
    C: Fn(ElementRef<'a>) -> bool + Copy + 'a,
{
    let stands_alone = move |card: ElementRef<'a>| {
        qualifies(card)
            && !card
                .select(cards)
                .any(|inner| qualifies(inner) && complete(inner))
    };
    root.filter(move |card| {
        stands_alone(*card)
            && !card
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|outer| cards.matches(&outer) && stands_alone(outer))
    })
}

/// Drops records whose key repeats an earlier one, keeping order.
fn dedup_by_key<T, K: Eq + Hash>(records: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(key(record)))
        .collect()
}
