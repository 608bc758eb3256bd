use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

use super::{AppJson, AppPath, AppQuery, Envelope};
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{MovieFilter, MovieUpdate, NewMovie},
    pagination::{DEFAULT_PAGE_SIZE, LinkedPage, Page, PageRequest},
    views::MovieView,
};

const SEARCH_YEAR_MIN: i32 = 1800;
const SEARCH_YEAR_MAX: i32 = 2100;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    page: Option<u64>,
    page_size: Option<u64>,
}

impl PageParams {
    fn request(&self) -> AppResult<PageRequest> {
        PageRequest::new(self.page.unwrap_or(1), self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    title: Option<String>,
    release_year: Option<i32>,
    #[serde(default)]
    genres: Vec<String>,
    page: Option<u64>,
    page_size: Option<u64>,
}

impl SearchParams {
    fn into_parts(self) -> AppResult<(MovieFilter, PageRequest)> {
        if let Some(year) = self.release_year {
            if !(SEARCH_YEAR_MIN..=SEARCH_YEAR_MAX).contains(&year) {
                return Err(AppError::invalid(format!(
                    "release_year must be between {SEARCH_YEAR_MIN} and {SEARCH_YEAR_MAX}"
                )));
            }
        }
        let page = PageParams { page: self.page, page_size: self.page_size }.request()?;
        let filter =
            MovieFilter { title: self.title, release_year: self.release_year, genres: self.genres };
        Ok((filter, page))
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<Envelope<Page<MovieView>>>> {
    let (filter, page) = params.into_parts()?;
    let data = state.movies.list_movies(&filter, page).await?;
    Ok(Envelope::success(data))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<Json<Envelope<Page<MovieView>>>> {
    let data = state.movies.list_movies(&MovieFilter::default(), params.request()?).await?;
    let pagination = data.pagination();
    Ok(Envelope::paginated(data, pagination))
}

pub async fn list_with_ratings(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<Envelope<LinkedPage<MovieView>>>> {
    let (filter, page) = params.into_parts()?;
    let data = state.movies.list_movies_with_ratings(&filter, page).await?;
    Ok(Envelope::success(data.into()))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Envelope<MovieView>>> {
    Ok(Envelope::success(state.movies.get_movie(id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<NewMovie>,
) -> AppResult<(StatusCode, Json<Envelope<MovieView>>)> {
    let movie = state.movies.create_movie(input).await?;
    Ok((StatusCode::CREATED, Envelope::success(movie)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<MovieUpdate>,
) -> AppResult<Json<Envelope<MovieView>>> {
    Ok(Envelope::success(state.movies.update_movie(id, input).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.movies.delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
