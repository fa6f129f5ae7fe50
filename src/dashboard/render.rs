//! Server-side HTML for the three pages, rendered with leptos.

use leptos::*;

use crate::scrape::{Product, Review, Testimonial};
use crate::sentiment::Sentiment;
use crate::summary::{report_months, Month, SentimentSummary};

use super::view::{
    ProductQuery, ReviewQuery, ReviewsView, TestimonialQuery, MAX_ROW_LIMIT, MIN_ROW_LIMIT,
    PRODUCT_COLUMNS, ROW_LIMIT_STEP,
};

pub const TITLE: &str = "E-commerce Brand Reputation Monitor (2023)";

const STYLE: &str = "
body { font-family: sans-serif; margin: 0; display: flex; }
nav { width: 12rem; padding: 1rem; background: #f4f4f6; min-height: 100vh; }
nav a { display: block; padding: .3rem 0; }
nav a.active { font-weight: bold; }
main { flex: 1; padding: 1rem 2rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: .3rem .5rem; text-align: left; vertical-align: top; }
.warning { background: #fff4d6; padding: .6rem; border-radius: 4px; }
.info { background: #e6f0ff; padding: .6rem; border-radius: 4px; }
.metrics { display: flex; gap: 2rem; margin: 1rem 0; }
.metric { font-size: 1.2rem; }
.bar { height: 1.2rem; background: #4c78a8; display: inline-block; }
.bar.negative { background: #e45756; }
";

const PAGES: [(&str, &str); 3] = [
    ("/products", "Products"),
    ("/testimonials", "Testimonials"),
    ("/reviews", "Reviews"),
];

/// Renders a whole document: sidebar, title and `body`.
fn page<F, N>(active: &'static str, body: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView,
{
    let html = leptos::ssr::render_to_string(move || {
        view! {
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <title>{format!("{TITLE} - {active}")}</title>
                    <style>{STYLE}</style>
                </head>
                <body>
                    <Nav active=active/>
                    <main>
                        <h1>{TITLE}</h1>
                        <p>
                            <small>
                                "Scraped from web-scraping.dev (Products / Testimonials / Reviews)"
                            </small>
                        </p>
                        {body()}
                    </main>
                </body>
            </html>
        }
    });
    format!("<!DOCTYPE html>\n{html}")
}

#[component]
fn Nav(active: &'static str) -> impl IntoView {
    view! {
        <nav>
            <h3>"Navigation"</h3>
            {PAGES
                .iter()
                .map(|&(href, label)| view! {
                    <a href=href class:active={label == active}>{label}</a>
                })
                .collect::<Vec<_>>()}
        </nav>
    }
}

fn warning(message: impl Into<String>) -> impl IntoView {
    let message = message.into();
    view! { <p class="warning">{message}</p> }
}

fn info(message: impl Into<String>) -> impl IntoView {
    let message = message.into();
    view! { <p class="info">{message}</p> }
}

pub fn error_page(message: &str) -> String {
    let message = message.to_owned();
    page("Error", move || {
        view! {
            <h2>"Something went wrong"</h2>
            {warning(message)}
        }
    })
}

fn product_row(product: Product) -> impl IntoView {
    view! {
        <tr>
            <td>{product.name}</td>
            <td>{product.description}</td>
            <td>{product.price}</td>
            <td>{product.page.to_string()}</td>
            <td>{product.id.map(|id| id.to_string())}</td>
            <td>{product.image.map(|src| view! { <img src=src width="48" alt=""/> })}</td>
            <td>{product.source_url}</td>
        </tr>
    }
}

pub fn products_page(rows: &[Product], query: &ProductQuery, loaded: usize) -> String {
    let rows = rows.to_vec();
    let q = query.q.clone().unwrap_or_default();
    let sort = query.sort.clone().unwrap_or_else(|| "name".to_owned());

    page("Products", move || {
        if loaded == 0 {
            return view! {
                <h2>"Products"</h2>
                {warning("products.json is empty or missing.")}
            }
            .into_view();
        }

        let shown = format!("{} of {loaded} products", rows.len());
        view! {
            <h2>"Products"</h2>
            <form method="get">
                <label>"Search (name/description) " <input name="q" value=q/></label>
                <label>
                    " Sort by "
                    <select name="sort">
                        {PRODUCT_COLUMNS
                            .iter()
                            .map(|&column| view! {
                                <option selected={column == sort}>{column}</option>
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
                <button>"Apply"</button>
            </form>
            <p>{shown}</p>
            <table>
                <tr>
                    <th>"name"</th>
                    <th>"description"</th>
                    <th>"price"</th>
                    <th>"page"</th>
                    <th>"id"</th>
                    <th>"image"</th>
                    <th>"source_url"</th>
                </tr>
                {rows.into_iter().map(product_row).collect::<Vec<_>>()}
            </table>
        }
        .into_view()
    })
}

fn testimonial_row(testimonial: Testimonial) -> impl IntoView {
    view! {
        <tr>
            <td>{testimonial.author}</td>
            <td>{testimonial.text}</td>
            <td>{testimonial.rating.map(|r| r.to_string())}</td>
            <td>{testimonial.source_url}</td>
        </tr>
    }
}

pub fn testimonials_page(rows: &[Testimonial], query: &TestimonialQuery, loaded: usize) -> String {
    let rows = rows.to_vec();
    let q = query.q.clone().unwrap_or_default();

    page("Testimonials", move || {
        if loaded == 0 {
            return view! {
                <h2>"Testimonials"</h2>
                {warning("testimonials.json is empty or missing.")}
            }
            .into_view();
        }

        let shown = format!("{} of {loaded} testimonials", rows.len());
        view! {
            <h2>"Testimonials"</h2>
            <form method="get">
                <label>"Search (author/text) " <input name="q" value=q/></label>
                <button>"Apply"</button>
            </form>
            <p>{shown}</p>
            <table>
                <tr>
                    <th>"author"</th>
                    <th>"text"</th>
                    <th>"rating"</th>
                    <th>"source_url"</th>
                </tr>
                {rows.into_iter().map(testimonial_row).collect::<Vec<_>>()}
            </table>
        }
        .into_view()
    })
}

#[component]
fn ReviewControls(current: Option<Month>, row_limit: usize, chosen: Vec<Sentiment>) -> impl IntoView {
    let sentiment_selected = move |value: &str| match chosen.as_slice() {
        [] => value == "all",
        [only] => only.as_label().eq_ignore_ascii_case(value),
        _ => false,
    };

    view! {
        <form method="get">
            <label>
                "Select a month (2023) "
                <select name="month">
                    <option value="all" selected={current.is_none()}>"All months"</option>
                    {report_months()
                        .into_iter()
                        .map(|month| view! {
                            <option value={month.key()} selected={Some(month) == current}>
                                {month.to_string()}
                            </option>
                        })
                        .collect::<Vec<_>>()}
                </select>
            </label>
            <label>
                " Max reviews to show "
                <select name="max">
                    {(MIN_ROW_LIMIT..=MAX_ROW_LIMIT)
                        .step_by(ROW_LIMIT_STEP)
                        .map(|limit| view! {
                            <option selected={limit == row_limit}>{limit.to_string()}</option>
                        })
                        .collect::<Vec<_>>()}
                </select>
            </label>
            <label>
                " Filter by sentiment "
                <select name="sentiment">
                    {[("all", "All"), ("positive", "Positive"), ("negative", "Negative")]
                        .into_iter()
                        .map(|(value, label)| view! {
                            <option value=value selected={sentiment_selected(value)}>{label}</option>
                        })
                        .collect::<Vec<_>>()}
                </select>
            </label>
            <button>"Apply"</button>
        </form>
    }
}

/// Headline counts. `month` is the label of the selected month, `None` for
/// all of them.
#[component]
fn Metrics(summary: SentimentSummary, month: Option<String>) -> impl IntoView {
    let total = match month {
        Some(month) => format!("Total reviews in {month}: {}", summary.total),
        None => format!("Total reviews: {}", summary.total),
    };

    view! {
        <div class="metrics">
            <span class="metric">{total}</span>
            <span class="metric">{format!("Positive: {}", summary.positive)}</span>
            <span class="metric">{format!("Negative: {}", summary.negative)}</span>
            {summary.mean_confidence.map(|mean| view! {
                <span class="metric" data-value={format!("{mean:.6}")}>
                    {format!("Avg confidence: {:.2}%", mean * 100.0)}
                </span>
            })}
        </div>
    }
}

#[component]
fn Distribution(summary: SentimentSummary) -> impl IntoView {
    let largest = summary.positive.max(summary.negative).max(1);

    view! {
        <h3>"Sentiment distribution"</h3>
        <table>
            {[(Sentiment::Positive, summary.positive), (Sentiment::Negative, summary.negative)]
                .into_iter()
                .map(|(sentiment, count)| {
                    let class = match sentiment {
                        Sentiment::Positive => "bar",
                        Sentiment::Negative => "bar negative",
                    };
                    let width = format!("width:{}px", count * 300 / largest);
                    view! {
                        <tr>
                            <th>{sentiment.as_label()}</th>
                            <td>
                                <span class=class style=width></span>
                                {format!(" {count}")}
                            </td>
                        </tr>
                    }
                })
                .collect::<Vec<_>>()}
        </table>
    }
}

fn review_row(review: Review) -> impl IntoView {
    view! {
        <tr>
            <td>{review.date.map(|d| d.format("%Y-%m-%d").to_string())}</td>
            <td>{review.text}</td>
            <td>{review.sentiment.map(|s| s.to_string())}</td>
            <td>{review.confidence.map(|c| format!("{c:.4}"))}</td>
            <td>{review.rating.map(|r| r.to_string())}</td>
            <td>{review.source_url}</td>
        </tr>
    }
}

pub fn reviews_page(reviews: &ReviewsView, query: &ReviewQuery, loaded: usize) -> String {
    let current = query.month().ok().flatten();
    let chosen = query.sentiments().unwrap_or_default();
    let row_limit = reviews.row_limit;
    let summary = reviews.summary;
    let month = reviews.month.clone();
    let scope = month.clone().unwrap_or_else(|| "all months".to_owned());
    let heading = format!(
        "Reviews for {scope} (showing up to {row_limit}, {} matching)",
        reviews.matching
    );
    let rows = reviews.rows.clone();

    page("Reviews", move || {
        if loaded == 0 {
            return view! {
                <h2>"Reviews - Sentiment Analysis"</h2>
                {warning("No reviews found (reviews_scored.json or reviews.json missing/empty).")}
            }
            .into_view();
        }
        if summary.total == 0 {
            return view! {
                <h2>"Reviews - Sentiment Analysis"</h2>
                <ReviewControls current=current row_limit=row_limit chosen=chosen/>
                {info(format!("No reviews found for {scope}."))}
            }
            .into_view();
        }

        view! {
            <h2>"Reviews - Sentiment Analysis"</h2>
            <ReviewControls current=current row_limit=row_limit chosen=chosen/>
            <h3>"Metrics"</h3>
            <Metrics summary=summary month=month/>
            <Distribution summary=summary/>
            <h3>{heading}</h3>
            <table>
                <tr>
                    <th>"date"</th>
                    <th>"text"</th>
                    <th>"sentiment"</th>
                    <th>"confidence"</th>
                    <th>"rating"</th>
                    <th>"source_url"</th>
                </tr>
                {rows.into_iter().map(review_row).collect::<Vec<_>>()}
            </table>
        }
        .into_view()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> SentimentSummary {
        SentimentSummary {
            total: 3,
            positive: 2,
            negative: 1,
            unscored: 0,
            mean_confidence: Some(0.8),
        }
    }

    #[test]
    fn metrics_show_counts_and_mean() {
        let summary = summary();
        let html =
            leptos::ssr::render_to_string(move || view! { <Metrics summary=summary month=None/> })
                .to_string();
        assert!(html.contains("Total reviews: 3"), "{html}");
        assert!(html.contains("Positive: 2"));
        assert!(html.contains("Negative: 1"));
        assert!(html.contains("Avg confidence: 80.00%"));
        assert!(html.contains("data-value=\"0.800000\""));
    }

    #[test]
    fn total_names_the_selected_month() {
        let summary = summary();
        let html = leptos::ssr::render_to_string(move || {
            view! { <Metrics summary=summary month=Some("Jan 2023".to_owned())/> }
        })
        .to_string();
        assert!(html.contains("Total reviews in Jan 2023: 3"), "{html}");
    }

    #[test]
    fn empty_products_warn() {
        let html = products_page(&[], &ProductQuery::default(), 0);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("products.json is empty or missing."));
    }

    #[test]
    fn product_names_are_escaped() {
        let product = Product {
            name: "<script>alert(1)".into(),
            ..Default::default()
        };
        let html = products_page(&[product], &ProductQuery::default(), 1);
        assert!(html.contains("&lt;script&gt;alert(1)"), "{html}");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn error_page_escapes_the_message() {
        let html = error_page("bad <json> in reviews.json");
        assert!(html.contains("Something went wrong"));
        assert!(html.contains("bad &lt;json&gt; in reviews.json"));
    }
}
