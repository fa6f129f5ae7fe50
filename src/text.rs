//! Small string helpers shared by the extractors.

use chrono::NaiveDate;
use scraper::ElementRef;
use url::Url;

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All text below `element`, cleaned.
pub fn element_text(element: ElementRef) -> String {
    clean(&element.text().collect::<Vec<_>>().join(" "))
}

/// First `YYYY-MM-DD` token in `text` that is a real calendar date.
pub fn find_iso_date(text: &str) -> Option<NaiveDate> {
    text.split(|c: char| !(c.is_ascii_digit() || c == '-'))
        .filter(|token| token.len() == 10 && token.starts_with("20"))
        .find_map(|token| NaiveDate::parse_from_str(token, "%Y-%m-%d").ok())
}

/// Removes every ISO date token from `text`.
pub fn strip_iso_dates(text: &str) -> String {
    let kept = text
        .split_whitespace()
        .filter(|word| find_iso_date(word).is_none())
        .collect::<Vec<_>>();
    kept.join(" ")
}

/// Parses a date written either as ISO or as `Jan 02 2023`, optionally
/// preceded by `Reviewed on`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = clean(text);
    if let Some(date) = find_iso_date(&text) {
        return Some(date);
    }
    let stripped = text
        .trim_start_matches("Reviewed on")
        .trim()
        .trim_start_matches("on ")
        .replace(',', "");
    ["%b %d %Y", "%B %d %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(stripped.trim(), fmt).ok())
}

/// `"$1,299.00"` -> `1299.0`. Returns `None` when no digits are present.
pub fn parse_price(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    digits.trim_end_matches('.').parse().ok()
}

/// Resolves `href` against the page it was found on.
pub fn absolute_url(page: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    page.join(href).ok().map(String::from)
}

/// First `take` characters, respecting char boundaries.
pub fn prefix(text: &str, take: usize) -> &str {
    match text.char_indices().nth(take) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_whitespace() {
        assert_eq!(clean("  a \n\t b  c "), "a b c");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn finds_iso_dates_inside_text() {
        let date = find_iso_date("Great stuff 2023-03-14 5 stars").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 3, 14).unwrap());
        assert!(find_iso_date("2023-13-40").is_none());
        assert!(find_iso_date("no date here").is_none());
    }

    #[test]
    fn parses_written_dates() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 2);
        assert_eq!(parse_date("Reviewed on Jan 02 2023"), expected);
        assert_eq!(parse_date("January 02, 2023"), expected);
        assert_eq!(parse_date("2023-01-02"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn strips_dates() {
        assert_eq!(strip_iso_dates("2023-05-01 Loved it"), "Loved it");
    }

    #[test]
    fn parses_prices() {
        assert_eq!(parse_price("$24.99"), Some(24.99));
        assert_eq!(parse_price("USD 1,299.00"), Some(1299.0));
        assert_eq!(parse_price("free"), None);
    }

    #[test]
    fn resolves_relative_links() {
        let page = Url::parse("https://web-scraping.dev/products?page=2").unwrap();
        assert_eq!(
            absolute_url(&page, "/assets/products/1.webp").as_deref(),
            Some("https://web-scraping.dev/assets/products/1.webp")
        );
        assert_eq!(absolute_url(&page, "  "), None);
    }

    #[test]
    fn prefix_respects_char_boundaries() {
        assert_eq!(prefix("héllo", 2), "hé");
        assert_eq!(prefix("hi", 80), "hi");
    }
}
