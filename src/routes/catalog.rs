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
    models::{NewDirector, NewGenre},
    views::{DirectorView, GenreView, MovieView},
};

pub async fn list_directors(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Envelope<Vec<DirectorView>>>> {
    Ok(Envelope::success(state.catalog.list_directors().await?))
}

pub async fn get_director(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Envelope<DirectorView>>> {
    Ok(Envelope::success(state.catalog.get_director(id).await?))
}

pub async fn create_director(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<NewDirector>,
) -> AppResult<(StatusCode, Json<Envelope<DirectorView>>)> {
    let director = state.catalog.create_director(input).await?;
    Ok((StatusCode::CREATED, Envelope::success(director)))
}

pub async fn director_movies(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Envelope<Vec<MovieView>>>> {
    Ok(Envelope::success(state.movies.movies_by_director(id).await?))
}

pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Envelope<Vec<GenreView>>>> {
    Ok(Envelope::success(state.catalog.list_genres().await?))
}

pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Envelope<GenreView>>> {
    Ok(Envelope::success(state.catalog.get_genre(id).await?))
}

pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<NewGenre>,
) -> AppResult<(StatusCode, Json<Envelope<GenreView>>)> {
    let genre = state.catalog.create_genre(input).await?;
    Ok((StatusCode::CREATED, Envelope::success(genre)))
}
