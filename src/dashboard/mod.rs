//! The web dashboard: three HTML pages over the scraped JSON files, plus
//! JSON twins of them under `/api`.

mod render;
mod routes;
pub mod view;

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use eyre::Result;
use log::info;

use crate::config::DataPaths;
use crate::scrape::{Product, Review, Testimonial};
use crate::sentiment::{clamp_confidence, score_reviews, SentimentClassifier};
use crate::store::load_json;

pub use render::TITLE;
pub use routes::configure;
use view::{reviews_in_scope, reviews_view, ReviewQuery, ReviewsView};

/// Shared by every request. The files are re-read each time so a new scrape
/// shows up without a restart.
pub struct AppState {
    paths: DataPaths,
    classifier: Arc<dyn SentimentClassifier>,
}

impl AppState {
    pub fn new(paths: DataPaths, classifier: Arc<dyn SentimentClassifier>) -> Self {
        AppState { paths, classifier }
    }

    pub fn products(&self) -> Result<Vec<Product>> {
        load_json(&self.paths.products())
    }

    pub fn testimonials(&self) -> Result<Vec<Testimonial>> {
        load_json(&self.paths.testimonials())
    }

    /// Precomputed scores when present, the raw scrape otherwise. Confidences
    /// written by other tools are pinned into `[0, 1]`.
    pub fn load_reviews(&self) -> Result<Vec<Review>> {
        let mut reviews: Vec<Review> = load_json(&self.paths.reviews_scored())?;
        if reviews.is_empty() {
            reviews = load_json(&self.paths.reviews())?;
        }
        for review in &mut reviews {
            review.confidence = review.confidence.map(clamp_confidence);
        }
        Ok(reviews)
    }

    /// Loads, scopes and classifies reviews for one page render. Returns the
    /// number of reviews on file alongside the view.
    pub async fn reviews(&self, query: &ReviewQuery) -> Result<(usize, ReviewsView)> {
        let all = self.load_reviews()?;
        let loaded = all.len();
        let mut scoped = reviews_in_scope(all, query)?;
        score_reviews(self.classifier.as_ref(), &mut scoped).await?;
        Ok((loaded, reviews_view(scoped, query)?))
    }
}

/// How the dashboard server binds.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub address: String,
    pub port: u16,
    pub data_dir: std::path::PathBuf,
    /// Adds `Access-Control-Allow-Origin: *` to every response.
    pub enable_cors: bool,
}

pub async fn serve(options: ServerOptions, classifier: Arc<dyn SentimentClassifier>) -> Result<()> {
    let state = web::Data::new(AppState::new(
        DataPaths::new(options.data_dir.clone()),
        classifier,
    ));
    let enable_cors = options.enable_cors;

    info!(
        "listening on http://{}:{} (data in {})",
        options.address,
        options.port,
        options.data_dir.display()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Condition::new(
                enable_cors,
                middleware::DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")),
            ))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((options.address.as_str(), options.port))?
    .run()
    .await?;

    Ok(())
}
