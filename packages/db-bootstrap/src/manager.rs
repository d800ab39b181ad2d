use std::sync::Arc;
use std::time::Duration;

use app_config::RuntimeEnv;
use async_trait::async_trait;
use sea_orm::sea_query::{Table, TableCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::{debug, info};

use crate::conn::{ConnectionParams, Dialect};
use crate::error::DbBootstrapError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// External collaborator that owns all persisted entity definitions.
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    /// Table definitions, in creation order. Dependents come after the
    /// tables they reference.
    fn tables(&self) -> Vec<TableCreateStatement>;

    /// Hook invoked once per connect, after authentication and before the
    /// first schema sync.
    async fn on_connect(&self, _conn: &DatabaseConnection) -> Result<(), DbBootstrapError> {
        Ok(())
    }
}

/// Owns a single live connection and its lifecycle: connect, sync schema,
/// disconnect. Reconnecting after a disconnect is supported; holding two
/// live connections on one manager is not.
pub struct DbManager<R> {
    env: RuntimeEnv,
    resolver: R,
    registry: Arc<dyn SchemaRegistry>,
    conn: Option<DatabaseConnection>,
}

impl<R> DbManager<R>
where
    R: Fn(RuntimeEnv) -> ConnectionParams,
{
    /// `resolver` maps the runtime environment to connection parameters;
    /// `registry` supplies the schema definitions to sync against.
    pub fn new(env: RuntimeEnv, resolver: R, registry: Arc<dyn SchemaRegistry>) -> Self {
        Self {
            env,
            resolver,
            registry,
            conn: None,
        }
    }

    pub fn env(&self) -> RuntimeEnv {
        self.env
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Borrow the live connection for data access.
    pub fn connection(&self) -> Result<&DatabaseConnection, DbBootstrapError> {
        self.conn.as_ref().ok_or(DbBootstrapError::NotConnected)
    }

    /// Connect and authenticate, run the registry's `on_connect` hook, then
    /// sync schema. The handle is stored only after every step succeeds, so
    /// a failure never leaves the manager half-connected. Errors propagate
    /// unmodified; there is no retry.
    pub async fn connect(&mut self) -> Result<(), DbBootstrapError> {
        if self.conn.is_some() {
            return Err(DbBootstrapError::AlreadyConnected);
        }

        let params = (self.resolver)(self.env);
        let mut options = ConnectOptions::new(params.url());
        options
            .acquire_timeout(CONNECT_TIMEOUT)
            .sqlx_logging(!self.env.is_test());
        if params.dialect == Dialect::Sqlite && params.database == ":memory:" {
            // each pooled connection to :memory: would open its own database
            options.min_connections(1).max_connections(1);
        }

        let conn = Database::connect(options).await?;
        conn.ping().await?;
        debug!(env = %self.env, dialect = ?params.dialect, "database connection established");

        self.registry.on_connect(&conn).await?;
        sync_schema(&conn, self.env, self.registry.as_ref()).await?;

        self.conn = Some(conn);
        Ok(())
    }

    /// Reconcile the store's structures with the registry's definitions.
    /// Destructive in the test environment, additive otherwise; idempotent
    /// in both.
    pub async fn sync(&self) -> Result<(), DbBootstrapError> {
        let conn = self.connection()?;
        sync_schema(conn, self.env, self.registry.as_ref()).await
    }

    /// Close the connection. The manager can connect again afterwards.
    pub async fn disconnect(&mut self) -> Result<(), DbBootstrapError> {
        let conn = self.conn.take().ok_or(DbBootstrapError::NotConnected)?;
        conn.close().await?;
        info!("database connection closed");
        Ok(())
    }
}

async fn sync_schema(
    conn: &DatabaseConnection,
    env: RuntimeEnv,
    registry: &dyn SchemaRegistry,
) -> Result<(), DbBootstrapError> {
    let backend = conn.get_database_backend();
    let tables = registry.tables();

    if env.is_test() {
        // drop in reverse creation order so dependents go before the tables
        // they reference
        for create in tables.iter().rev() {
            if let Some(table) = create.get_table_name() {
                let drop_stmt = Table::drop().table(table.clone()).if_exists().to_owned();
                conn.execute(backend.build(&drop_stmt)).await?;
            }
        }
        for create in &tables {
            conn.execute(backend.build(create)).await?;
        }
    } else {
        for create in &tables {
            let mut create = create.clone();
            create.if_not_exists();
            conn.execute(backend.build(&create)).await?;
        }
    }

    info!(
        env = %env,
        table_count = tables.len(),
        destructive = env.is_test(),
        "schema synchronized"
    );
    Ok(())
}
