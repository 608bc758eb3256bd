use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::{entities::director, error::AppResult, models::NewDirector};

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<director::Model>> {
    Ok(director::Entity::find_by_id(id).one(db).await?)
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    Ok(director::Entity::find_by_id(id).count(db).await? > 0)
}

pub async fn all<C: ConnectionTrait>(db: &C) -> AppResult<Vec<director::Model>> {
    Ok(director::Entity::find().order_by_asc(director::Column::Id).all(db).await?)
}

pub async fn find_many_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> AppResult<Vec<director::Model>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(director::Entity::find()
        .filter(director::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewDirector) -> AppResult<director::Model> {
    let model = director::ActiveModel {
        id: Default::default(),
        name: Set(input.name),
        birth_year: Set(input.birth_year),
        description: Set(input.description),
    };
    Ok(model.insert(db).await?)
}
