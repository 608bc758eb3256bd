use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};

use super::{current_year, director_not_found};
use crate::{
    error::{AppError, AppResult},
    models::{NewDirector, NewGenre},
    repository::{director as director_repo, genre as genre_repo},
    views::{DirectorView, GenreView},
};

/// Directors and genres, the reference data movies point at.
#[derive(Clone, Debug)]
pub struct CatalogService {
    db: DatabaseConnection,
}

impl CatalogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_directors(&self) -> AppResult<Vec<DirectorView>> {
        let directors = director_repo::all(&self.db).await?;
        Ok(directors.into_iter().map(DirectorView::from).collect())
    }

    pub async fn get_director(&self, id: i32) -> AppResult<DirectorView> {
        director_repo::find_by_id(&self.db, id)
            .await?
            .map(DirectorView::from)
            .ok_or_else(|| director_not_found(id))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_director(&self, mut input: NewDirector) -> AppResult<DirectorView> {
        input.name = required_name(&input.name)?;
        if let Some(year) = input.birth_year {
            if year > current_year() {
                return Err(AppError::invalid("birth_year cannot be in the future"));
            }
        }

        let director = director_repo::create(&self.db, input).await?;
        info!(director_id = director.id, "director created");
        Ok(director.into())
    }

    pub async fn list_genres(&self) -> AppResult<Vec<GenreView>> {
        let genres = genre_repo::all(&self.db).await?;
        Ok(genres.into_iter().map(GenreView::from).collect())
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<GenreView> {
        genre_repo::find_by_id(&self.db, id)
            .await?
            .map(GenreView::from)
            .ok_or_else(|| AppError::not_found(format!("genre {id} not found")))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_genre(&self, mut input: NewGenre) -> AppResult<GenreView> {
        input.name = required_name(&input.name)?;

        let txn = self.db.begin().await?;
        let existing = genre_repo::find_many_by_names(&txn, std::slice::from_ref(&input.name)).await?;
        if !existing.is_empty() {
            return Err(AppError::Conflict(format!("genre {} already exists", input.name)));
        }
        let genre = genre_repo::create(&txn, input).await?;
        txn.commit().await?;

        info!(genre_id = genre.id, "genre created");
        Ok(genre.into())
    }
}

fn required_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid("name is required"));
    }
    Ok(name.to_string())
}
