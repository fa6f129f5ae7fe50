use actix_web::{http::header, web, HttpResponse};
use log::error;

use super::render;
use super::view::{
    products_view, testimonials_view, validate, ProductQuery, ReviewQuery, TestimonialQuery,
};
use super::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/products", web::get().to(products))
        .route("/testimonials", web::get().to(testimonials))
        .route("/reviews", web::get().to(reviews))
        .service(
            web::scope("/api")
                .route("/products", web::get().to(api_products))
                .route("/testimonials", web::get().to(api_testimonials))
                .route("/reviews", web::get().to(api_reviews))
                .route("/reviews/summary", web::get().to(api_review_summary)),
        );
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn failure(err: eyre::Report) -> HttpResponse {
    error!("[DASHBOARD] {err:#}");
    HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body(render::error_page(&format!("{err:#}")))
}

fn bad_request(err: eyre::Report) -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type("text/plain; charset=utf-8")
        .body(err.to_string())
}

async fn index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/reviews"))
        .finish()
}

async fn products(state: web::Data<AppState>, query: web::Query<ProductQuery>) -> HttpResponse {
    match state.products() {
        Ok(all) => {
            let loaded = all.len();
            let rows = products_view(all, &query);
            html(render::products_page(&rows, &query, loaded))
        }
        Err(err) => failure(err),
    }
}

async fn testimonials(
    state: web::Data<AppState>,
    query: web::Query<TestimonialQuery>,
) -> HttpResponse {
    match state.testimonials() {
        Ok(all) => {
            let loaded = all.len();
            let rows = testimonials_view(all, &query);
            html(render::testimonials_page(&rows, &query, loaded))
        }
        Err(err) => failure(err),
    }
}

async fn reviews(state: web::Data<AppState>, query: web::Query<ReviewQuery>) -> HttpResponse {
    if let Err(err) = validate(&query) {
        return bad_request(err);
    }
    match state.reviews(&query).await {
        Ok((loaded, view)) => html(render::reviews_page(&view, &query, loaded)),
        Err(err) => failure(err),
    }
}

async fn api_products(state: web::Data<AppState>, query: web::Query<ProductQuery>) -> HttpResponse {
    match state.products() {
        Ok(all) => HttpResponse::Ok().json(products_view(all, &query)),
        Err(err) => failure(err),
    }
}

async fn api_testimonials(
    state: web::Data<AppState>,
    query: web::Query<TestimonialQuery>,
) -> HttpResponse {
    match state.testimonials() {
        Ok(all) => HttpResponse::Ok().json(testimonials_view(all, &query)),
        Err(err) => failure(err),
    }
}

async fn api_reviews(state: web::Data<AppState>, query: web::Query<ReviewQuery>) -> HttpResponse {
    if let Err(err) = validate(&query) {
        return bad_request(err);
    }
    match state.reviews(&query).await {
        Ok((_, view)) => HttpResponse::Ok().json(view),
        Err(err) => failure(err),
    }
}

async fn api_review_summary(
    state: web::Data<AppState>,
    query: web::Query<ReviewQuery>,
) -> HttpResponse {
    if let Err(err) = validate(&query) {
        return bad_request(err);
    }
    match state.reviews(&query).await {
        Ok((_, view)) => HttpResponse::Ok().json(view.summary),
        Err(err) => failure(err),
    }
}
