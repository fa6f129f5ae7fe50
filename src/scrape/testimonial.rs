use eyre::Result;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Site;
use crate::text::{element_text, prefix};

use super::review::star_rating;

const MIN_TESTIMONIAL_LEN: usize = 10;

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
/// A customer testimonial.
pub struct Testimonial {
    pub author: Option<String>,
    /// Testimonial body. Never empty.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub source_url: String,
}

/// Body of a testimonial block: its first paragraph, or the whole quote.
fn testimonial_text(block: ElementRef) -> String {
    let text_selector = &Selector::parse("p, [class*='text']").unwrap();
    if block.value().name() == "blockquote" {
        return element_text(block);
    }
    block
        .select(text_selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Extracts every testimonial on a page or on an infinite-scroll fragment.
pub fn extract_testimonials(html: &str, url: &Url) -> Vec<Testimonial> {
    let block_selector = &Selector::parse(
        "div.testimonial, div[class*='testimonial'], blockquote, div.card, article",
    )
    .unwrap();
    let author_selector = &Selector::parse("[class*='author'], strong, h3, h4").unwrap();

    // fragments come without <html>; parse_document copes with both
    let document = Html::parse_document(html);

    let long_enough =
        |block: ElementRef| testimonial_text(block).chars().count() >= MIN_TESTIMONIAL_LEN;

    let testimonials = super::innermost_cards(
        document.select(block_selector),
        block_selector,
        long_enough,
        long_enough,
    )
    .map(|block| {
        let author = block
            .select(author_selector)
            .next()
            .map(element_text)
            .filter(|author| !author.is_empty());

        Testimonial {
            author,
            text: testimonial_text(block),
            rating: star_rating(block),
            source_url: url.to_string(),
        }
    })
    .collect::<Vec<_>>();

    super::dedup_by_key(testimonials, testimonial_key)
}

fn testimonial_key(t: &Testimonial) -> (String, String) {
    (
        t.author.clone().unwrap_or_default(),
        prefix(&t.text, 80).to_owned(),
    )
}

/// Loads `/testimonials`, then keeps requesting the scroll fragments the page
/// would fetch until one adds nothing new.
pub async fn scrape_testimonials(
    client: &Client,
    site: &Site,
    max_pages: u32,
) -> Result<Vec<Testimonial>> {
    super::paginate(
        client,
        max_pages,
        |page| site.testimonials_page(page),
        |html, _, url| extract_testimonials(html, url),
        testimonial_key,
    )
    .await
}
