//! Data access. Every function is generic over [`sea_orm::ConnectionTrait`]
//! so it runs the same against the pool or inside a write transaction.

pub mod director;
pub mod genre;
pub mod movie;
pub mod rating;
