use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
    sea_query::{Expr, Func, LikeExpr, Query, SelectStatement, SimpleExpr},
};

use crate::{
    entities::{genre, movie, movie_genre, rating},
    error::AppResult,
    models::MovieFilter,
    pagination::PageRequest,
};

/// A movie row with its rating aggregate computed in the same query.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct MovieAggregateRow {
    pub id: i32,
    pub title: String,
    pub director_id: i32,
    pub release_year: i32,
    pub cast: Option<String>,
    pub average_rating: f64,
    pub ratings_count: i64,
}

impl MovieAggregateRow {
    pub fn into_parts(self) -> (movie::Model, f64, i64) {
        let movie = movie::Model {
            id: self.id,
            title: self.title,
            director_id: self.director_id,
            release_year: self.release_year,
            cast: self.cast,
        };
        (movie, self.average_rating, self.ratings_count)
    }
}

/// Column values for a movie insert.
#[derive(Clone, Debug)]
pub struct MovieDraft {
    pub title: String,
    pub director_id: i32,
    pub release_year: i32,
    pub cast: Option<String>,
}

/// Rows removed by [`delete`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub movies: u64,
    pub ratings: u64,
    pub genre_links: u64,
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    filter: &MovieFilter,
    page: PageRequest,
) -> AppResult<(Vec<movie::Model>, u64)> {
    let query = filtered(filter);
    let total = query.clone().count(db).await?;

    let rows = query
        .order_by_asc(movie::Column::Id)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await?;

    Ok((rows, total))
}

/// Like [`list`], with ratings left-joined and grouped per movie so the page
/// comes back with its aggregates in one round trip.
pub async fn list_with_ratings<C: ConnectionTrait>(
    db: &C,
    filter: &MovieFilter,
    page: PageRequest,
) -> AppResult<(Vec<MovieAggregateRow>, u64)> {
    let query = filtered(filter);
    let total = query.clone().count(db).await?;

    let rows = query
        .select_only()
        .columns([
            movie::Column::Id,
            movie::Column::Title,
            movie::Column::DirectorId,
            movie::Column::ReleaseYear,
            movie::Column::Cast,
        ])
        .column_as(coalesced_average(), "average_rating")
        .column_as(rating_count(), "ratings_count")
        .left_join(rating::Entity)
        .group_by(movie::Column::Id)
        .order_by_asc(movie::Column::Id)
        .offset(page.offset())
        .limit(page.limit())
        .into_model::<MovieAggregateRow>()
        .all(db)
        .await?;

    Ok((rows, total))
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<movie::Model>> {
    Ok(movie::Entity::find_by_id(id).one(db).await?)
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    Ok(movie::Entity::find_by_id(id).count(db).await? > 0)
}

pub async fn find_by_director<C: ConnectionTrait>(
    db: &C,
    director_id: i32,
) -> AppResult<Vec<movie::Model>> {
    Ok(movie::Entity::find()
        .filter(movie::Column::DirectorId.eq(director_id))
        .order_by_asc(movie::Column::Id)
        .all(db)
        .await?)
}

/// Genre names per movie, sorted by name.
pub async fn genre_names<C: ConnectionTrait>(
    db: &C,
    movie_ids: &[i32],
) -> AppResult<HashMap<i32, Vec<String>>> {
    if movie_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let pairs: Vec<(i32, String)> = movie_genre::Entity::find()
        .select_only()
        .column(movie_genre::Column::MovieId)
        .column(genre::Column::Name)
        .inner_join(genre::Entity)
        .filter(movie_genre::Column::MovieId.is_in(movie_ids.iter().copied()))
        .order_by_asc(movie_genre::Column::MovieId)
        .order_by_asc(genre::Column::Name)
        .into_tuple()
        .all(db)
        .await?;

    let mut out: HashMap<i32, Vec<String>> = HashMap::new();
    for (movie_id, name) in pairs {
        out.entry(movie_id).or_default().push(name);
    }
    Ok(out)
}

pub async fn insert<C: ConnectionTrait>(db: &C, draft: MovieDraft) -> AppResult<movie::Model> {
    let model = movie::ActiveModel {
        id: Default::default(),
        title: Set(draft.title),
        director_id: Set(draft.director_id),
        release_year: Set(draft.release_year),
        cast: Set(draft.cast),
    };
    Ok(model.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    model: movie::ActiveModel,
) -> AppResult<movie::Model> {
    Ok(model.update(db).await?)
}

pub async fn attach_genres<C: ConnectionTrait>(
    db: &C,
    movie_id: i32,
    genre_ids: &[i32],
) -> AppResult<()> {
    if genre_ids.is_empty() {
        return Ok(());
    }
    let links = genre_ids.iter().map(|&genre_id| movie_genre::ActiveModel {
        movie_id: Set(movie_id),
        genre_id: Set(genre_id),
    });
    movie_genre::Entity::insert_many(links).exec_without_returning(db).await?;
    Ok(())
}

/// Swaps the movie's whole genre set for `genre_ids`.
pub async fn replace_genres<C: ConnectionTrait>(
    db: &C,
    movie_id: i32,
    genre_ids: &[i32],
) -> AppResult<()> {
    movie_genre::Entity::delete_many()
        .filter(movie_genre::Column::MovieId.eq(movie_id))
        .exec(db)
        .await?;
    attach_genres(db, movie_id, genre_ids).await
}

/// Removes the movie together with its ratings and genre links. Run inside a
/// transaction.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<DeleteOutcome> {
    let ratings = rating::Entity::delete_many()
        .filter(rating::Column::MovieId.eq(id))
        .exec(db)
        .await?
        .rows_affected;

    let genre_links = movie_genre::Entity::delete_many()
        .filter(movie_genre::Column::MovieId.eq(id))
        .exec(db)
        .await?
        .rows_affected;

    let movies = movie::Entity::delete_by_id(id).exec(db).await?.rows_affected;

    Ok(DeleteOutcome { movies, ratings, genre_links })
}

fn filtered(filter: &MovieFilter) -> Select<movie::Entity> {
    let mut query = movie::Entity::find();

    if let Some(title) = filter.title_fragment() {
        let title_col = Expr::col((movie::Entity, movie::Column::Title));
        query = query.filter(
            Expr::expr(Func::lower(title_col))
                .like(LikeExpr::new(contains_pattern(title)).escape(LIKE_ESCAPE)),
        );
    }

    if let Some(year) = filter.release_year {
        query = query.filter(movie::Column::ReleaseYear.eq(year));
    }

    let genres = filter.genre_names();
    if !genres.is_empty() {
        query = query.filter(movie::Column::Id.in_subquery(movies_with_all_genres(&genres)));
    }

    query
}

/// Ids of movies linked to every one of `names`: links are matched by name,
/// grouped per movie, and only movies whose match count equals the number of
/// requested names survive. `names` must be distinct.
fn movies_with_all_genres(names: &[String]) -> SelectStatement {
    Query::select()
        .column((movie_genre::Entity, movie_genre::Column::MovieId))
        .from(movie_genre::Entity)
        .inner_join(
            genre::Entity,
            Expr::col((genre::Entity, genre::Column::Id))
                .equals((movie_genre::Entity, movie_genre::Column::GenreId)),
        )
        .and_where(Expr::col((genre::Entity, genre::Column::Name)).is_in(names.iter().cloned()))
        .group_by_col((movie_genre::Entity, movie_genre::Column::MovieId))
        .and_having(
            Expr::expr(Expr::col((movie_genre::Entity, movie_genre::Column::GenreId)).count())
                .eq(names.len() as i64),
        )
        .to_owned()
}

const LIKE_ESCAPE: char = '!';

/// `%fragment%` with wildcards escaped. Only ASCII is folded, matching
/// SQLite's `LOWER()` on the column side.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn coalesced_average() -> SimpleExpr {
    Func::coalesce([
        SimpleExpr::from(Func::avg(Expr::col((rating::Entity, rating::Column::Score)))),
        Expr::val(0.0_f64).into(),
    ])
    .into()
}

fn rating_count() -> SimpleExpr {
    Expr::col((rating::Entity, rating::Column::Id)).count()
}
