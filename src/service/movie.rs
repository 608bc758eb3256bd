use std::collections::HashMap;

use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{debug, info, instrument};

use super::{current_year, director_not_found, movie_not_found};
use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{MovieFilter, MovieUpdate, NewMovie, Patch, distinct_names},
    pagination::{Page, PageRequest},
    repository::{
        director as director_repo,
        genre as genre_repo,
        movie::{self as movie_repo, MovieDraft},
        rating as rating_repo,
    },
    views::{MovieLookups, MovieView, RatingStats},
};

pub const FIRST_FILM_YEAR: i32 = 1888;
const MAX_TITLE_LEN: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeletedMovie {
    pub id: i32,
    pub ratings_removed: u64,
}

#[derive(Clone, Debug)]
pub struct MovieService {
    db: DatabaseConnection,
}

impl MovieService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Filtered page of movies. Aggregates for the whole page come from one
    /// grouped query over the page's ids.
    #[instrument(skip(self))]
    pub async fn list_movies(
        &self,
        filter: &MovieFilter,
        page: PageRequest,
    ) -> AppResult<Page<MovieView>> {
        let (movies, total) = movie_repo::list(&self.db, filter, page).await?;

        let ids: Vec<i32> = movies.iter().map(|m| m.id).collect();
        let mut stats = rating_repo::stats_for_movies(&self.db, &ids).await?;

        let rows = movies
            .into_iter()
            .map(|m| {
                let s = stats.remove(&m.id).unwrap_or(RatingStats::EMPTY);
                (m, s)
            })
            .collect();
        let items = hydrate(&self.db, rows).await?;

        debug!(total, returned = items.len(), "listed movies");
        Ok(Page::new(items, page, total))
    }

    #[instrument(skip(self))]
    pub async fn list_movies_with_ratings(
        &self,
        filter: &MovieFilter,
        page: PageRequest,
    ) -> AppResult<Page<MovieView>> {
        let (rows, total) = movie_repo::list_with_ratings(&self.db, filter, page).await?;

        let rows = rows
            .into_iter()
            .map(|row| {
                let (m, avg, n) = row.into_parts();
                (m, RatingStats::from_coalesced(avg, n))
            })
            .collect();
        let items = hydrate(&self.db, rows).await?;

        debug!(total, returned = items.len(), "listed movies with ratings");
        Ok(Page::new(items, page, total))
    }

    #[instrument(skip(self))]
    pub async fn get_movie(&self, id: i32) -> AppResult<MovieView> {
        let movie = movie_repo::find_by_id(&self.db, id).await?.ok_or_else(|| movie_not_found(id))?;
        let stats = rating_repo::stats(&self.db, id).await?;
        one_view(&self.db, movie, stats).await
    }

    #[instrument(skip(self))]
    pub async fn movies_by_director(&self, director_id: i32) -> AppResult<Vec<MovieView>> {
        if !director_repo::exists(&self.db, director_id).await? {
            return Err(director_not_found(director_id));
        }

        let movies = movie_repo::find_by_director(&self.db, director_id).await?;
        let ids: Vec<i32> = movies.iter().map(|m| m.id).collect();
        let mut stats = rating_repo::stats_for_movies(&self.db, &ids).await?;

        let rows = movies
            .into_iter()
            .map(|m| {
                let s = stats.remove(&m.id).unwrap_or(RatingStats::EMPTY);
                (m, s)
            })
            .collect();
        hydrate(&self.db, rows).await
    }

    /// Creates a movie and its genre links in one transaction. Every genre
    /// name must already exist.
    #[instrument(skip(self, input), fields(title = %input.title, director_id = input.director_id))]
    pub async fn create_movie(&self, input: NewMovie) -> AppResult<MovieView> {
        let draft = MovieDraft {
            title: validate_title(&input.title)?,
            director_id: input.director_id,
            release_year: validate_release_year(input.release_year)?,
            cast: normalize_cast(input.cast),
        };

        let txn = self.db.begin().await?;

        if !director_repo::exists(&txn, draft.director_id).await? {
            return Err(director_not_found(draft.director_id));
        }
        let genre_ids = resolve_genres(&txn, &input.genres).await?;

        let movie = movie_repo::insert(&txn, draft).await?;
        movie_repo::attach_genres(&txn, movie.id, &genre_ids).await?;

        // nothing can have rated it yet
        let view = one_view(&txn, movie, RatingStats::EMPTY).await?;
        txn.commit().await?;

        info!(movie_id = view.id, genres = view.genres.len(), "movie created");
        Ok(view)
    }

    /// Applies the fields present in `input`. A supplied `genres` list, even
    /// an empty one, replaces the whole genre set.
    #[instrument(skip(self, input))]
    pub async fn update_movie(&self, id: i32, input: MovieUpdate) -> AppResult<MovieView> {
        let txn = self.db.begin().await?;

        let current = movie_repo::find_by_id(&txn, id).await?.ok_or_else(|| movie_not_found(id))?;
        let mut active: movie::ActiveModel = current.clone().into();

        match input.title {
            Patch::Absent => {},
            Patch::Null => return Err(AppError::invalid("title cannot be null")),
            Patch::Value(title) => active.title = Set(validate_title(&title)?),
        }

        match input.release_year {
            Patch::Absent => {},
            Patch::Null => return Err(AppError::invalid("release_year cannot be null")),
            Patch::Value(year) => active.release_year = Set(validate_release_year(year)?),
        }

        match input.cast {
            Patch::Absent => {},
            Patch::Null => active.cast = Set(None),
            Patch::Value(cast) => active.cast = Set(normalize_cast(Some(cast))),
        }

        match input.director_id {
            Patch::Absent => {},
            Patch::Null => return Err(AppError::invalid("director_id cannot be null")),
            Patch::Value(director_id) => {
                if !director_repo::exists(&txn, director_id).await? {
                    return Err(director_not_found(director_id));
                }
                active.director_id = Set(director_id);
            },
        }

        let genre_ids = match input.genres {
            Patch::Absent => None,
            Patch::Null => return Err(AppError::invalid("genres cannot be null")),
            Patch::Value(names) => Some(resolve_genres(&txn, &names).await?),
        };

        let movie = if active.is_changed() {
            movie_repo::update(&txn, active).await?
        } else {
            current
        };
        if let Some(genre_ids) = &genre_ids {
            movie_repo::replace_genres(&txn, id, genre_ids).await?;
        }

        let stats = rating_repo::stats(&txn, id).await?;
        let view = one_view(&txn, movie, stats).await?;
        txn.commit().await?;

        info!(movie_id = id, genres_replaced = genre_ids.is_some(), "movie updated");
        Ok(view)
    }

    /// Deletes the movie and its ratings atomically.
    #[instrument(skip(self))]
    pub async fn delete_movie(&self, id: i32) -> AppResult<DeletedMovie> {
        let txn = self.db.begin().await?;

        let outcome = movie_repo::delete(&txn, id).await?;
        if outcome.movies == 0 {
            return Err(movie_not_found(id));
        }
        txn.commit().await?;

        info!(
            movie_id = id,
            ratings_removed = outcome.ratings,
            genre_links_removed = outcome.genre_links,
            "movie deleted"
        );
        Ok(DeletedMovie { id, ratings_removed: outcome.ratings })
    }
}

pub fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::invalid("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::invalid(format!("title must be at most {MAX_TITLE_LEN} characters")));
    }
    Ok(title.to_string())
}

pub fn validate_release_year(year: i32) -> AppResult<i32> {
    let max = current_year();
    if !(FIRST_FILM_YEAR..=max).contains(&year) {
        return Err(AppError::invalid(format!(
            "release_year must be between {FIRST_FILM_YEAR} and {max}"
        )));
    }
    Ok(year)
}

fn normalize_cast(cast: Option<String>) -> Option<String> {
    cast.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

/// Resolves every name to a genre id, or fails naming the ones that don't
/// exist. Nothing is created.
async fn resolve_genres<C: ConnectionTrait>(db: &C, names: &[String]) -> AppResult<Vec<i32>> {
    let wanted = distinct_names(names);
    let found = genre_repo::find_many_by_names(db, &wanted).await?;

    if found.len() != wanted.len() {
        let missing: Vec<&str> = wanted
            .iter()
            .filter(|name| !found.iter().any(|g| &g.name == *name))
            .map(String::as_str)
            .collect();
        return Err(AppError::not_found(format!("genres not found: {}", missing.join(", "))));
    }

    Ok(found.into_iter().map(|g| g.id).collect())
}

/// Builds views for a batch of movies with one director query and one genre
/// query.
async fn hydrate<C: ConnectionTrait>(
    db: &C,
    rows: Vec<(movie::Model, RatingStats)>,
) -> AppResult<Vec<MovieView>> {
    let movie_ids: Vec<i32> = rows.iter().map(|(m, _)| m.id).collect();
    let mut director_ids: Vec<i32> = rows.iter().map(|(m, _)| m.director_id).collect();
    director_ids.sort_unstable();
    director_ids.dedup();

    let directors: HashMap<_, _> = director_repo::find_many_by_ids(db, &director_ids)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();
    let genres = movie_repo::genre_names(db, &movie_ids).await?;

    let mut lookups = MovieLookups { directors, genres };
    rows.into_iter().map(|(m, s)| lookups.view(m, s)).collect()
}

async fn one_view<C: ConnectionTrait>(
    db: &C,
    movie: movie::Model,
    stats: RatingStats,
) -> AppResult<MovieView> {
    let id = movie.id;
    hydrate(db, vec![(movie, stats)])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("no view built for movie {id}")))
}
