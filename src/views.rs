//! Read models returned across the service boundary, and the translation of
//! raw rating aggregates into them.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    entities::{director, genre, movie, rating},
    error::{AppError, AppResult},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DirectorSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DirectorView {
    pub id: i32,
    pub name: String,
    pub birth_year: Option<i32>,
    pub description: Option<String>,
}

impl From<director::Model> for DirectorView {
    fn from(d: director::Model) -> Self {
        Self { id: d.id, name: d.name, birth_year: d.birth_year, description: d.description }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenreView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<genre::Model> for GenreView {
    fn from(g: genre::Model) -> Self {
        Self { id: g.id, name: g.name, description: g.description }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieView {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub director: DirectorSummary,
    pub genres: Vec<String>,
    pub cast: Option<String>,
    pub average_rating: Option<f64>,
    pub ratings_count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RatingView {
    pub id: i32,
    pub movie_id: i32,
    pub score: i32,
    pub created_at: jiff::Timestamp,
}

impl TryFrom<rating::Model> for RatingView {
    type Error = AppError;

    fn try_from(r: rating::Model) -> AppResult<Self> {
        Ok(Self {
            id: r.id,
            movie_id: r.movie_id,
            score: r.score,
            created_at: jiff::Timestamp::from_second(r.created_at)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RatingSummary {
    pub movie_id: i32,
    pub average_rating: Option<f64>,
    pub ratings_count: u64,
}

/// Average and count of a movie's ratings. The average is `None` whenever
/// there are no ratings, regardless of what the store reported.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RatingStats {
    pub average: Option<f64>,
    pub count: u64,
}

impl RatingStats {
    pub const EMPTY: Self = Self { average: None, count: 0 };

    /// From a `COALESCE(AVG(score), 0)` / `COUNT(id)` pair.
    pub fn from_coalesced(average: f64, count: i64) -> Self {
        Self::from_nullable(Some(average), count)
    }

    pub fn from_nullable(average: Option<f64>, count: i64) -> Self {
        let count = u64::try_from(count).unwrap_or(0);
        if count == 0 {
            return Self::EMPTY;
        }
        Self { average: average.map(round2), count }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Directors and genre names for a batch of movies, used to build views
/// without a query per movie.
#[derive(Debug, Default)]
pub struct MovieLookups {
    pub directors: HashMap<i32, director::Model>,
    pub genres: HashMap<i32, Vec<String>>,
}

impl MovieLookups {
    pub fn view(&mut self, movie: movie::Model, stats: RatingStats) -> AppResult<MovieView> {
        let director = self.directors.get(&movie.director_id).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "movie {} references missing director {}",
                movie.id,
                movie.director_id
            ))
        })?;

        Ok(MovieView {
            id: movie.id,
            title: movie.title,
            release_year: movie.release_year,
            director: DirectorSummary { id: director.id, name: director.name.clone() },
            genres: self.genres.remove(&movie.id).unwrap_or_default(),
            cast: movie.cast,
            average_rating: stats.average,
            ratings_count: stats.count,
        })
    }
}
