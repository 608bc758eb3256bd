use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts},
    routing::get,
};
use serde::Serialize;

use crate::{AppState, error::AppError, pagination::Pagination};

mod catalog;
mod health;
mod movies;
mod ratings;

pub const API_PREFIX: &str = "/api/v1";

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/movies", get(movies::list).post(movies::create))
        .route("/movies/list", get(movies::list))
        .route("/movies/search", get(movies::search))
        .route("/movies/ratings", get(movies::list_with_ratings))
        .route("/movies/health", get(health::liveness))
        .route("/movies/detail/{id}", get(movies::detail))
        .route("/movies/{id}", axum::routing::put(movies::update).delete(movies::remove))
        .route("/movies/{id}/ratings", get(ratings::list).post(ratings::create))
        .route("/movies/{id}/ratings/average", get(ratings::average))
        .route("/directors", get(catalog::list_directors).post(catalog::create_director))
        .route("/directors/{id}", get(catalog::get_director))
        .route("/directors/{id}/movies", get(catalog::director_movies))
        .route("/genres", get(catalog::list_genres).post(catalog::create_genre))
        .route("/genres/{id}", get(catalog::get_genre));

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .nest(API_PREFIX, api)
        .with_state(state)
}

/// Success envelope shared by every JSON response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self { status: "success", data, pagination: None })
    }

    pub fn paginated(data: T, pagination: Pagination) -> Json<Self> {
        Json(Self { status: "success", data, pagination: Some(pagination) })
    }
}

/// `Json` whose rejections render as a 400 failure envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Path` whose rejections render as a 400 failure envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query-string extractor accepting repeated keys (`genres=a&genres=b`), with
/// rejections rendered as a 400 failure envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
