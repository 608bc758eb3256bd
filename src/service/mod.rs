mod catalog;
mod movie;
mod rating;

pub use catalog::CatalogService;
pub use movie::{DeletedMovie, MovieService, validate_release_year, validate_title};
pub use rating::{MAX_SCORE, MIN_SCORE, RatingService, validate_score};

use crate::error::AppError;

pub(crate) fn movie_not_found(id: i32) -> AppError {
    AppError::not_found(format!("movie {id} not found"))
}

pub(crate) fn director_not_found(id: i32) -> AppError {
    AppError::not_found(format!("director {id} not found"))
}

pub(crate) fn current_year() -> i32 {
    i32::from(jiff::Zoned::now().year())
}
