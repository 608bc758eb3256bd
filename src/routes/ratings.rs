use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use super::{AppJson, AppPath, Envelope};
use crate::{
    AppState,
    error::AppResult,
    models::NewRating,
    service::validate_score,
    views::{RatingSummary, RatingView},
};

pub async fn create(
    State(state): State<Arc<AppState>>,
    AppPath(movie_id): AppPath<i32>,
    AppJson(input): AppJson<NewRating>,
) -> AppResult<(StatusCode, Json<Envelope<RatingView>>)> {
    let score = validate_score(input.score)?;
    let rating = state.ratings.create_rating(movie_id, score).await?;
    Ok((StatusCode::CREATED, Envelope::success(rating)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    AppPath(movie_id): AppPath<i32>,
) -> AppResult<Json<Envelope<Vec<RatingView>>>> {
    Ok(Envelope::success(state.ratings.get_movie_ratings(movie_id).await?))
}

pub async fn average(
    State(state): State<Arc<AppState>>,
    AppPath(movie_id): AppPath<i32>,
) -> AppResult<Json<Envelope<RatingSummary>>> {
    Ok(Envelope::success(state.ratings.get_movie_average_rating(movie_id).await?))
}
