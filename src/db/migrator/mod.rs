use sea_orm_migration::prelude::*;

mod m20240401_initial;
mod m20240402_comment_post_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240401_initial::Migration),
            Box::new(m20240402_comment_post_index::Migration),
        ]
    }
}
