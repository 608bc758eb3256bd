use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::{entities::genre, error::AppResult, models::NewGenre};

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<genre::Model>> {
    Ok(genre::Entity::find_by_id(id).one(db).await?)
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    Ok(genre::Entity::find_by_id(id).count(db).await? > 0)
}

pub async fn all<C: ConnectionTrait>(db: &C) -> AppResult<Vec<genre::Model>> {
    Ok(genre::Entity::find().order_by_asc(genre::Column::Name).all(db).await?)
}

pub async fn find_many_by_ids<C: ConnectionTrait>(db: &C, ids: &[i32]) -> AppResult<Vec<genre::Model>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(genre::Entity::find()
        .filter(genre::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(genre::Column::Name)
        .all(db)
        .await?)
}

pub async fn find_many_by_names<C: ConnectionTrait>(
    db: &C,
    names: &[String],
) -> AppResult<Vec<genre::Model>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    Ok(genre::Entity::find()
        .filter(genre::Column::Name.is_in(names.iter().cloned()))
        .order_by_asc(genre::Column::Name)
        .all(db)
        .await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewGenre) -> AppResult<genre::Model> {
    let model = genre::ActiveModel {
        id: Default::default(),
        name: Set(input.name),
        description: Set(input.description),
    };
    Ok(model.insert(db).await?)
}
