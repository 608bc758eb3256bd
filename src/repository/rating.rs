use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
    sea_query::{Expr, Func, SimpleExpr},
};

use crate::{entities::rating, error::AppResult, views::RatingStats};

pub async fn create<C: ConnectionTrait>(
    db: &C,
    movie_id: i32,
    score: i32,
) -> AppResult<rating::Model> {
    let model = rating::ActiveModel {
        id: Default::default(),
        movie_id: Set(movie_id),
        score: Set(score),
        created_at: Set(jiff::Timestamp::now().as_second()),
    };
    Ok(model.insert(db).await?)
}

/// Ratings for a movie in creation order.
pub async fn for_movie<C: ConnectionTrait>(db: &C, movie_id: i32) -> AppResult<Vec<rating::Model>> {
    Ok(rating::Entity::find()
        .filter(rating::Column::MovieId.eq(movie_id))
        .order_by_asc(rating::Column::CreatedAt)
        .order_by_asc(rating::Column::Id)
        .all(db)
        .await?)
}

/// `AVG(score)`, `None` when the movie has no ratings.
pub async fn average<C: ConnectionTrait>(db: &C, movie_id: i32) -> AppResult<Option<f64>> {
    let avg: Option<Option<f64>> = rating::Entity::find()
        .select_only()
        .column_as(average_score(), "average_rating")
        .filter(rating::Column::MovieId.eq(movie_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(avg.flatten())
}

pub async fn count<C: ConnectionTrait>(db: &C, movie_id: i32) -> AppResult<u64> {
    Ok(rating::Entity::find().filter(rating::Column::MovieId.eq(movie_id)).count(db).await?)
}

/// Average and count for one movie in a single aggregate query.
pub async fn stats<C: ConnectionTrait>(db: &C, movie_id: i32) -> AppResult<RatingStats> {
    let row: Option<(Option<f64>, i64)> = rating::Entity::find()
        .select_only()
        .column_as(average_score(), "average_rating")
        .column_as(rating_count(), "ratings_count")
        .filter(rating::Column::MovieId.eq(movie_id))
        .into_tuple()
        .one(db)
        .await?;

    Ok(row.map(|(avg, n)| RatingStats::from_nullable(avg, n)).unwrap_or(RatingStats::EMPTY))
}

/// Aggregates for a batch of movies, grouped in one query. Movies without
/// ratings are absent from the map.
pub async fn stats_for_movies<C: ConnectionTrait>(
    db: &C,
    movie_ids: &[i32],
) -> AppResult<HashMap<i32, RatingStats>> {
    if movie_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, Option<f64>, i64)> = rating::Entity::find()
        .select_only()
        .column(rating::Column::MovieId)
        .column_as(average_score(), "average_rating")
        .column_as(rating_count(), "ratings_count")
        .filter(rating::Column::MovieId.is_in(movie_ids.iter().copied()))
        .group_by(rating::Column::MovieId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(movie_id, avg, n)| (movie_id, RatingStats::from_nullable(avg, n)))
        .collect())
}

fn average_score() -> SimpleExpr {
    Func::avg(Expr::col((rating::Entity, rating::Column::Score))).into()
}

fn rating_count() -> SimpleExpr {
    Expr::col((rating::Entity, rating::Column::Id)).count()
}
