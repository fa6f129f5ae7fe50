//! Fixed endpoints, file names and the environment-backed settings shared by
//! the binaries.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use url::Url;

/// The one site this crate knows how to scrape.
pub const DEFAULT_BASE_URL: &str = "https://web-scraping.dev";

pub const PRODUCTS_FILE: &str = "products.json";
pub const TESTIMONIALS_FILE: &str = "testimonials.json";
pub const REVIEWS_FILE: &str = "reviews.json";
pub const REVIEWS_SCORED_FILE: &str = "reviews_scored.json";

/// Upper bound on listing pages walked per category.
pub const MAX_PAGES: u32 = 50;

pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_ADDRESS: &str = "127.0.0.1";

/// Where the scraped site lives. Tests point this at a local fixture server.
#[derive(Debug, Clone)]
pub struct Site {
    pub base: Url,
}

impl Site {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base).wrap_err_with(|| format!("invalid base url {base}"))?;
        Ok(Site { base })
    }

    /// `SCRAPE_BASE_URL` or the default site.
    pub fn from_env() -> Result<Self> {
        let base = std::env::var("SCRAPE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Site::new(&base)
    }

    pub fn products_page(&self, page: u32) -> Result<Url> {
        let mut url = self.base.join("/products")?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }

    pub fn reviews_page(&self, page: u32) -> Result<Url> {
        let mut url = self.base.join("/reviews")?;
        if page > 1 {
            url.query_pairs_mut().append_pair("page", &page.to_string());
        }
        Ok(url)
    }

    pub fn testimonials_page(&self, page: u32) -> Result<Url> {
        if page <= 1 {
            return Ok(self.base.join("/testimonials")?);
        }
        let mut url = self.base.join("/api/testimonials")?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }
}

/// Locations of the JSON collections inside one data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub dir: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DataPaths { dir: dir.into() }
    }

    /// `DATA_DIR` or the working directory.
    pub fn from_env() -> Self {
        DataPaths::new(std::env::var("DATA_DIR").unwrap_or_else(|_| ".".into()))
    }

    pub fn products(&self) -> PathBuf {
        self.dir.join(PRODUCTS_FILE)
    }

    pub fn testimonials(&self) -> PathBuf {
        self.dir.join(TESTIMONIALS_FILE)
    }

    pub fn reviews(&self) -> PathBuf {
        self.dir.join(REVIEWS_FILE)
    }

    pub fn reviews_scored(&self) -> PathBuf {
        self.dir.join(REVIEWS_SCORED_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
