//! Scrape products, testimonials and reviews from web-scraping.dev, score
//! review sentiment with a pretrained model and browse everything in a small
//! web dashboard.
//!
//! The three stages are separate binaries:
//! - `brand_monitor` writes `products.json`, `reviews.json` and
//!   `testimonials.json`, replacing earlier runs.
//! - `score` writes `reviews_scored.json` so the dashboard need not call the
//!   model at render time.
//! - `dashboard` serves the pages.

pub mod cli;
pub mod config;
pub mod dashboard;
mod fetch;
pub mod scrape;
pub mod sentiment;
pub mod store;
pub mod summary;
pub mod text;

use header::{HeaderMap, HeaderValue};
use reqwest::header;

pub use fetch::build_client;
pub use url::Url;

/// Builds the default headers for the client.
fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers
}

/// Starts `env_logger` at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}
