use eyre::Result;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Site;
use crate::text::{absolute_url, element_text, parse_price};

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
/// A product listed on the site's catalogue pages.
pub struct Product {
    /// Numeric id taken from the `/product/<id>` link.
    pub id: Option<u32>,
    /// Product name. Never empty.
    pub name: String,
    /// Short description shown on the listing.
    pub description: String,
    /// Price as displayed.
    pub price: Option<String>,
    /// Price parsed as a number.
    pub price_value: Option<f64>,
    /// Absolute URL of the listing image.
    pub image: Option<String>,
    /// Absolute URL of the product page.
    pub url: Option<String>,
    /// Listing page the product was found on.
    pub page: u32,
    /// Listing page URL.
    pub source_url: String,
}

/// Extracts every product card on one listing page.
pub fn extract_products(html: &str, page: u32, url: &Url) -> Vec<Product> {
    let card_selector = &Selector::parse("div.card, article, div[class*='product']").unwrap();
    let name_selector = &Selector::parse("h2, h3, h2 a, h3 a, a").unwrap();
    let description_selector = &Selector::parse(".short-description, p").unwrap();
    let price_selector = &Selector::parse(".price, [class*='price']").unwrap();
    let link_selector = &Selector::parse("a[href]").unwrap();
    let img_selector = &Selector::parse("img").unwrap();

    let document = Html::parse_document(html);

    let has_name = |card: ElementRef| card.select(name_selector).next().is_some();
    // a title block alone is not a card
    let has_details = |card: ElementRef| {
        card.select(price_selector).next().is_some()
            || card.select(description_selector).next().is_some()
    };

    let products = super::innermost_cards(
        document.select(card_selector),
        card_selector,
        has_name,
        has_details,
    )
    .filter_map(|card| {
        let name = card.select(name_selector).next().map(element_text)?;
        if name.is_empty() {
            return None;
        }

        let description = card
            .select(description_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let price = card
            .select(price_selector)
            .map(element_text)
            .find(|price| !price.is_empty());
        let price_value = price.as_deref().and_then(parse_price);

        let link = card
            .select(link_selector)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| absolute_url(url, href));
        let id = link.as_deref().and_then(product_id);

        let image = card
            .select(img_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| absolute_url(url, src));

        Some(Product {
            id,
            name,
            description,
            price,
            price_value,
            image,
            url: link,
            page,
            source_url: url.to_string(),
        })
    })
    .collect::<Vec<_>>();

    super::dedup_by_key(products, |p| (p.name.clone(), p.price.clone()))
}

/// `https://web-scraping.dev/product/12?variant=x` -> `12`.
fn product_id(link: &str) -> Option<u32> {
    let url = Url::parse(link).ok()?;
    let mut segments = url.path_segments()?;
    segments.find(|s| *s == "product")?;
    segments.next()?.parse().ok()
}

/// Walks `/products?page=N` until a page adds nothing new.
pub async fn scrape_products(client: &Client, site: &Site, max_pages: u32) -> Result<Vec<Product>> {
    super::paginate(
        client,
        max_pages,
        |page| site.products_page(page),
        extract_products,
        |p: &Product| (p.name.clone(), p.price.clone()),
    )
    .await
}
