#![allow(dead_code)]

use app_config::RuntimeEnv;
use db_bootstrap::{ConnectionParams, DbBootstrapError, DbManager, SchemaRegistry};
use sea_orm::sea_query::{Alias, ColumnDef, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, Statement};
use std::sync::Arc;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    test_support::logging::init();
}

/// Minimal registry used across the lifecycle and transaction suites: one
/// `notes` table with an autoincrement id and a text label.
pub struct NotesRegistry;

impl SchemaRegistry for NotesRegistry {
    fn tables(&self) -> Vec<TableCreateStatement> {
        vec![Table::create()
            .table(Alias::new("notes"))
            .col(
                ColumnDef::new(Alias::new("id"))
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Alias::new("label")).string().not_null())
            .to_owned()]
    }
}

pub fn memory_params(_env: RuntimeEnv) -> ConnectionParams {
    ConnectionParams::in_memory()
}

/// Manager over an in-memory sqlite store with the `notes` registry.
pub fn memory_manager(env: RuntimeEnv) -> DbManager<fn(RuntimeEnv) -> ConnectionParams> {
    DbManager::new(env, memory_params, Arc::new(NotesRegistry))
}

pub async fn insert_note<C>(conn: &C, label: &str) -> Result<(), DbBootstrapError>
where
    C: ConnectionTrait,
{
    let sql = format!("INSERT INTO notes (label) VALUES ('{label}')");
    conn.execute_unprepared(&sql).await?;
    Ok(())
}

pub async fn count_notes<C>(conn: &C, label: &str) -> Result<i64, DbBootstrapError>
where
    C: ConnectionTrait,
{
    let sql = format!("SELECT COUNT(*) AS n FROM notes WHERE label = '{label}'");
    let row = conn
        .query_one(Statement::from_string(conn.get_database_backend(), sql))
        .await?
        .expect("count query should return one row");
    Ok(row.try_get("", "n")?)
}
