use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use brand_monitor::config::DataPaths;
use brand_monitor::dashboard::{configure, AppState};
use brand_monitor::scrape::{Product, Review, Testimonial};
use brand_monitor::sentiment::{Classification, Sentiment, SentimentClassifier};
use brand_monitor::store::save_json;
use chrono::NaiveDate;

/// Labels come from a fixed table keyed by review text.
struct FixedClassifier {
    answers: Vec<(String, Classification)>,
    calls: AtomicUsize,
}

#[async_trait]
impl SentimentClassifier for FixedClassifier {
    async fn classify(&self, text: &str) -> eyre::Result<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .iter()
            .find(|(t, _)| t == text)
            .map(|(_, c)| *c)
            .ok_or_else(|| eyre::eyre!("no fixed answer for {text:?}"))
    }
}

struct Fixture {
    dir: PathBuf,
    confidences: Vec<f64>,
    classifier: Arc<FixedClassifier>,
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// Ten January reviews: seven the classifier calls positive, three negative.
fn fixture(name: &str) -> Fixture {
    let dir = std::env::temp_dir().join(format!("brand_monitor_dash_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    let confidences = vec![0.91, 0.87, 0.99, 0.65, 0.78, 0.93, 0.55, 0.81, 0.97, 0.72];
    let mut reviews = Vec::new();
    let mut answers = Vec::new();
    for (i, &confidence) in confidences.iter().enumerate() {
        let text = format!("review number {i} about the product");
        let label = if i < 7 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };
        answers.push((text.clone(), Classification::new(label, confidence)));
        reviews.push(Review {
            date: NaiveDate::from_ymd_opt(2023, 1, i as u32 + 1),
            text,
            source_url: "https://web-scraping.dev/reviews".into(),
            ..Default::default()
        });
    }
    save_json(&dir.join("reviews.json"), &reviews).unwrap();

    Fixture {
        dir,
        confidences,
        classifier: Arc::new(FixedClassifier {
            answers,
            calls: AtomicUsize::new(0),
        }),
    }
}

fn state(fixture: &Fixture) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        DataPaths::new(fixture.dir.clone()),
        fixture.classifier.clone(),
    ))
}

#[actix_web::test]
async fn reviews_page_shows_classifier_counts() {
    let fixture = fixture("counts");
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/reviews").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    assert!(body.contains("Positive: 7"), "{body}");
    assert!(body.contains("Negative: 3"), "{body}");
    assert!(body.contains("Total reviews: 10"));

    let mean = fixture.confidences.iter().sum::<f64>() / fixture.confidences.len() as f64;
    assert!(body.contains(&format!("data-value=\"{mean:.6}\"")));
    assert!(body.contains(&format!("Avg confidence: {:.2}%", mean * 100.0)));
}

#[actix_web::test]
async fn summary_mean_matches_individual_confidences() {
    let fixture = fixture("summary");
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/reviews/summary?month=2023-01")
        .to_request();
    let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(summary["total"], 10);
    assert_eq!(summary["positive"], 7);
    assert_eq!(summary["negative"], 3);
    assert_eq!(summary["unscored"], 0);
    let expected = fixture.confidences.iter().sum::<f64>() / 10.0;
    let mean = summary["mean_confidence"].as_f64().unwrap();
    assert!((mean - expected).abs() < 1e-6);
}

#[actix_web::test]
async fn other_months_are_empty() {
    let fixture = fixture("month");
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/reviews?month=2023-06").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("No reviews found for Jun 2023."));
    assert_eq!(fixture.classifier.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn sentiment_filter_and_row_limit() {
    let fixture = fixture("filter");
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/reviews?sentiment=negative&max=5")
        .to_request();
    let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["matching"], 3);
    assert_eq!(view["summary"]["total"], 10);
    let rows = view["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["sentiment"] == "NEGATIVE"));
    // newest first
    assert_eq!(rows[0]["date"], "2023-01-10");

    let req = test::TestRequest::get().uri("/api/reviews?max=5").to_request();
    let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["rows"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn precomputed_scores_skip_the_classifier() {
    let fixture = fixture("precomputed");
    let scored = vec![Review {
        date: NaiveDate::from_ymd_opt(2023, 1, 5),
        text: "already scored elsewhere".into(),
        sentiment: Some(Sentiment::Negative),
        confidence: Some(0.6),
        ..Default::default()
    }];
    save_json(&fixture.dir.join("reviews_scored.json"), &scored).unwrap();
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/reviews/summary").to_request();
    let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["total"], 1);
    assert_eq!(summary["negative"], 1);
    assert_eq!(fixture.classifier.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn month_total_names_the_month() {
    let fixture = fixture("monthtotal");
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/reviews?month=2023-01").to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("Total reviews in Jan 2023: 10"), "{body}");
}

#[actix_web::test]
async fn precomputed_confidences_are_clamped() {
    let fixture = fixture("clamped");
    let scored = vec![
        Review {
            date: NaiveDate::from_ymd_opt(2023, 1, 5),
            text: "scored by another tool".into(),
            sentiment: Some(Sentiment::Positive),
            confidence: Some(1.7),
            ..Default::default()
        },
        Review {
            date: NaiveDate::from_ymd_opt(2023, 1, 6),
            text: "also scored elsewhere".into(),
            sentiment: Some(Sentiment::Negative),
            confidence: Some(-0.4),
            ..Default::default()
        },
    ];
    save_json(&fixture.dir.join("reviews_scored.json"), &scored).unwrap();
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/reviews").to_request();
    let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let confidences = view["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["confidence"].as_f64().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(confidences, [0.0, 1.0]);
    assert_eq!(view["summary"]["mean_confidence"], 0.5);
}

#[actix_web::test]
async fn bad_month_is_a_client_error() {
    let fixture = fixture("badmonth");
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/reviews?month=Smarch").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn products_and_testimonials_pages() {
    let fixture = fixture("catalogue");
    let products = vec![
        Product {
            id: Some(2),
            name: "Dark Red Energy Potion".into(),
            description: "Unleash the power".into(),
            price: Some("4.99".into()),
            price_value: Some(4.99),
            page: 1,
            ..Default::default()
        },
        Product {
            id: Some(1),
            name: "Box of Chocolate Candy".into(),
            description: "Sweet".into(),
            price: Some("24.99".into()),
            price_value: Some(24.99),
            page: 1,
            ..Default::default()
        },
    ];
    save_json(&fixture.dir.join("products.json"), &products).unwrap();
    let testimonials = vec![Testimonial {
        author: Some("Jane D.".into()),
        text: "We've been using this utility for years".into(),
        rating: Some(5),
        source_url: "https://web-scraping.dev/testimonials".into(),
    }];
    save_json(&fixture.dir.join("testimonials.json"), &testimonials).unwrap();

    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/products?q=potion").to_request();
    let found: Vec<Product> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(2));

    let req = test::TestRequest::get().uri("/products?sort=price").to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    let potion = body.find("Dark Red Energy Potion").unwrap();
    let chocolate = body.find("Box of Chocolate Candy").unwrap();
    assert!(potion < chocolate);

    let req = test::TestRequest::get().uri("/testimonials?q=jane").to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("been using this utility for years"));
}

#[actix_web::test]
async fn missing_files_render_warnings() {
    let fixture = fixture("empty");
    fs::remove_file(fixture.dir.join("reviews.json")).unwrap();
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    for (uri, warning) in [
        ("/products", "products.json is empty or missing."),
        ("/testimonials", "testimonials.json is empty or missing."),
        ("/reviews", "No reviews found"),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains(warning), "{uri}: {body}");
    }
}

#[actix_web::test]
async fn root_redirects_to_reviews() {
    let fixture = fixture("root");
    let app = test::init_service(App::new().app_data(state(&fixture)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get("location").unwrap(), "/reviews");
}
