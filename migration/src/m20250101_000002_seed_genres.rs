use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "War",
    "Western",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Genres::Table).columns([Genres::Name]);
        for name in GENRES {
            insert.values([(*name).into()]).map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        insert.on_conflict(OnConflict::column(Genres::Name).do_nothing().to_owned());

        manager.exec_stmt(insert.to_owned()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Genres::Table)
                    .and_where(Expr::col(Genres::Name).is_in(GENRES.iter().copied()))
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Name,
}
