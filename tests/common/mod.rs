// Shared helpers for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cinerate::{
    AppState, db,
    models::{NewDirector, NewMovie},
    routes,
    views::MovieView,
};
use serde_json::Value;
use tower::ServiceExt;

/// Fresh in-memory database with migrations applied. A single pooled
/// connection keeps the database alive for the whole test.
pub async fn test_state() -> AppState {
    let db = db::connect_and_migrate("sqlite::memory:", 1).await.expect("in-memory database");
    AppState::new(db)
}

pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (routes::router(Arc::new(state.clone())), state)
}

pub async fn director(state: &AppState, name: &str) -> i32 {
    state
        .catalog
        .create_director(NewDirector { name: name.into(), birth_year: None, description: None })
        .await
        .expect("create director")
        .id
}

pub fn new_movie(title: &str, director_id: i32, release_year: i32, genres: &[&str]) -> NewMovie {
    NewMovie {
        title: title.into(),
        director_id,
        release_year,
        cast: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

pub async fn movie(
    state: &AppState,
    title: &str,
    director_id: i32,
    release_year: i32,
    genres: &[&str],
) -> MovieView {
    state
        .movies
        .create_movie(new_movie(title, director_id, release_year, genres))
        .await
        .expect("create movie")
}

pub async fn rate(state: &AppState, movie_id: i32, scores: &[i32]) {
    for &score in scores {
        state.ratings.create_rating(movie_id, score).await.expect("create rating");
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}
