//! AskMe Migration - schema management
//!
//! Applied by `askme-server migrate` and, when `askme.db.migrateOnStartup`
//! is set, before the HTTP server starts.

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240601_000001_create_tables::Migration)]
    }
}
