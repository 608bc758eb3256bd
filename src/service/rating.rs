use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument, warn};

use super::movie_not_found;
use crate::{
    error::{AppError, AppResult},
    repository::{movie as movie_repo, rating as rating_repo},
    views::{RatingSummary, RatingView, round2},
};

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

pub fn validate_score(score: i32) -> AppResult<i32> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(AppError::invalid(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    Ok(score)
}

#[derive(Clone, Debug)]
pub struct RatingService {
    db: DatabaseConnection,
}

impl RatingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends a rating. The score is checked here even though the HTTP layer
    /// checks it too, since callers may reach the service directly.
    #[instrument(skip(self))]
    pub async fn create_rating(&self, movie_id: i32, score: i32) -> AppResult<RatingView> {
        let txn = self.db.begin().await?;

        if !movie_repo::exists(&txn, movie_id).await? {
            warn!(movie_id, "rating for unknown movie");
            return Err(movie_not_found(movie_id));
        }
        let score = validate_score(score)?;

        let rating = rating_repo::create(&txn, movie_id, score).await?;
        txn.commit().await?;

        info!(movie_id, rating_id = rating.id, score, "rating created");
        RatingView::try_from(rating)
    }

    #[instrument(skip(self))]
    pub async fn get_movie_ratings(&self, movie_id: i32) -> AppResult<Vec<RatingView>> {
        if !movie_repo::exists(&self.db, movie_id).await? {
            return Err(movie_not_found(movie_id));
        }

        let ratings = rating_repo::for_movie(&self.db, movie_id).await?;
        ratings.into_iter().map(RatingView::try_from).collect()
    }

    #[instrument(skip(self))]
    pub async fn get_movie_average_rating(&self, movie_id: i32) -> AppResult<RatingSummary> {
        if !movie_repo::exists(&self.db, movie_id).await? {
            return Err(movie_not_found(movie_id));
        }

        let ratings_count = rating_repo::count(&self.db, movie_id).await?;
        let average_rating = match ratings_count {
            0 => None,
            _ => rating_repo::average(&self.db, movie_id).await?.map(round2),
        };

        Ok(RatingSummary { movie_id, average_rating, ratings_count })
    }
}
