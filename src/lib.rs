pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod service;
pub mod views;

use sea_orm::DatabaseConnection;

use crate::service::{CatalogService, MovieService, RatingService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub movies: MovieService,
    pub ratings: RatingService,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            movies: MovieService::new(db.clone()),
            ratings: RatingService::new(db.clone()),
            catalog: CatalogService::new(db.clone()),
            db,
        }
    }
}
