use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::core::persistence::cost::aws_cost_entity::AwsCostEntity;

/// Database every Postgres server has; used to look up and create the target database.
pub const ADMIN_DATABASE: &str = "postgres";

pub const CREATE_AWS_COSTS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS aws_costs (
    id SERIAL PRIMARY KEY,
    service_name TEXT,
    amortized_cost NUMERIC,
    blended_cost NUMERIC,
    unblended_cost NUMERIC,
    usage_quantity NUMERIC,
    unit TEXT
)";

const INSERT_AWS_COST: &str = "\
INSERT INTO aws_costs (service_name, amortized_cost, blended_cost, unblended_cost, usage_quantity, unit)
VALUES ($1, $2, $3, $4, $5, $6)";

/// Postgres adapter for the `aws_costs` table.
///
/// Every operation opens its own connection and closes it before returning,
/// on failure too (the connection is dropped, which closes the socket).
#[derive(Debug, Clone)]
pub struct AwsCostPgAdapter {
    settings: DatabaseSettings,
}

impl AwsCostPgAdapter {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }

    pub fn database_name(&self) -> &str {
        &self.settings.name
    }

    fn connect_options(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.settings.host)
            .port(self.settings.port)
            .username(&self.settings.user)
            .password(&self.settings.password)
            .database(database)
    }

    async fn connect(&self, database: &str) -> Result<PgConnection, sqlx::Error> {
        debug!(host = %self.settings.host, database, "Opening Postgres connection");
        PgConnection::connect_with(&self.connect_options(database)).await
    }

    pub async fn ensure_database(&self) -> Result<bool, sqlx::Error> {
        let mut conn = self.connect(ADMIN_DATABASE).await?;
        let outcome = create_database_if_absent(&mut conn, &self.settings.name).await;
        close_after(conn, outcome).await
    }

    pub async fn ensure_table(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.connect(&self.settings.name).await?;
        let outcome = sqlx::query(CREATE_AWS_COSTS_TABLE)
            .execute(&mut conn)
            .await
            .map(|_| ());
        close_after(conn, outcome).await
    }

    pub async fn insert_rows(&self, rows: &[AwsCostEntity]) -> Result<u64, sqlx::Error> {
        let mut conn = self.connect(&self.settings.name).await?;
        let outcome = insert_batch(&mut conn, rows).await;
        close_after(conn, outcome).await
    }
}

async fn create_database_if_absent(conn: &mut PgConnection, name: &str) -> Result<bool, sqlx::Error> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    if exists.is_some() {
        debug!(database = name, "Database already exists");
        return Ok(false);
    }

    // CREATE DATABASE takes no bind parameters and cannot run inside a transaction.
    let statement = format!("CREATE DATABASE {}", quote_identifier(name));
    sqlx::query(&statement).execute(&mut *conn).await?;
    info!(database = name, "Created database");
    Ok(true)
}

/// All rows go in one transaction; dropping it on error rolls the batch back.
async fn insert_batch(conn: &mut PgConnection, rows: &[AwsCostEntity]) -> Result<u64, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let mut inserted = 0;

    for row in rows {
        inserted += sqlx::query(INSERT_AWS_COST)
            .bind(&row.service_name)
            .bind(row.amortized_cost)
            .bind(row.blended_cost)
            .bind(row.unblended_cost)
            .bind(row.usage_quantity)
            .bind(&row.unit)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn close_after<T>(conn: PgConnection, outcome: Result<T, sqlx::Error>) -> Result<T, sqlx::Error> {
    match outcome {
        Ok(value) => {
            conn.close().await?;
            Ok(value)
        }
        Err(err) => {
            drop(conn);
            Err(err)
        }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
