use eyre::{bail, Result, WrapErr};
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds the client every scrape request goes through.
pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .default_headers(crate::build_headers())
        .timeout(Duration::from_secs(45))
        .build()?;
    Ok(client)
}

/// Outcome of a paginated request.
#[derive(Debug)]
pub enum Page {
    Html(String),
    /// The server answered with a non-success status; pagination ends here.
    End(StatusCode),
}

/// GET `url` and return its body, failing on any non-success status.
pub async fn fetch_html(client: &Client, url: &Url) -> Result<String> {
    match fetch_page(client, url).await? {
        Page::Html(body) => Ok(body),
        Page::End(status) => bail!("GET {url} returned {status}"),
    }
}

/// GET `url`, reporting a non-success status as [`Page::End`] rather than an
/// error. Transport failures still propagate.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<Page> {
    debug!("GET {url}");
    let response = client
        .get(url.to_owned())
        .send()
        .await
        .wrap_err_with(|| format!("request to {url} failed"))?;
    let status = response.status();
    if !status.is_success() {
        debug!("GET {url} -> {status}");
        return Ok(Page::End(status));
    }
    let body = response
        .text()
        .await
        .wrap_err_with(|| format!("reading body of {url} failed"))?;
    Ok(Page::Html(body))
}
