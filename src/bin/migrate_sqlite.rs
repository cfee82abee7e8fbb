//! One-off copy of a legacy SQLite database into MySQL
//!
//! Usage: `migrate_sqlite [path/to/socio.db]`. The MySQL target is read from
//! `database.url` in `config.*` or `SOCIO__DATABASE__URL`. Rows are upserted,
//! so the tool can be re-run; rows MySQL rejects are logged and skipped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use sqlx::mysql::{MySqlArguments, MySqlPoolOptions};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{MySql, MySqlPool, Row, SqlitePool};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SQLITE_PATH: &str = "data/socio-copy.db";

#[derive(Debug, Clone, Copy)]
enum Kind {
    Text,
    Int,
    Real,
    Timestamp,
}

struct Table {
    name: &'static str,
    key: &'static str,
    columns: &'static [(&'static str, Kind)],
}

const TABLES: &[Table] = &[
    Table {
        name: "users",
        key: "email",
        columns: &[
            ("id", Kind::Text),
            ("auth_uuid", Kind::Text),
            ("email", Kind::Text),
            ("name", Kind::Text),
            ("avatar_url", Kind::Text),
            ("is_organiser", Kind::Int),
            ("course", Kind::Text),
            ("register_number", Kind::Text),
            ("created_at", Kind::Timestamp),
        ],
    },
    Table {
        name: "fests",
        key: "fest_id",
        columns: &[
            ("id", Kind::Text),
            ("fest_id", Kind::Text),
            ("fest_title", Kind::Text),
            ("description", Kind::Text),
            ("opening_date", Kind::Text),
            ("closing_date", Kind::Text),
            ("fest_image_url", Kind::Text),
            ("organizing_dept", Kind::Text),
            ("department_access", Kind::Text),
            ("category", Kind::Text),
            ("contact_email", Kind::Text),
            ("contact_phone", Kind::Text),
            ("event_heads", Kind::Text),
            ("created_by", Kind::Text),
            ("auth_uuid", Kind::Text),
            ("created_at", Kind::Timestamp),
        ],
    },
    Table {
        name: "events",
        key: "event_id",
        columns: &[
            ("id", Kind::Text),
            ("event_id", Kind::Text),
            ("title", Kind::Text),
            ("description", Kind::Text),
            ("event_date", Kind::Text),
            ("event_time", Kind::Text),
            ("end_date", Kind::Text),
            ("venue", Kind::Text),
            ("category", Kind::Text),
            ("department_access", Kind::Text),
            ("claims_applicable", Kind::Int),
            ("registration_fee", Kind::Real),
            ("participants_per_team", Kind::Int),
            ("max_participants", Kind::Int),
            ("event_image_url", Kind::Text),
            ("banner_url", Kind::Text),
            ("pdf_url", Kind::Text),
            ("rules", Kind::Text),
            ("schedule", Kind::Text),
            ("prizes", Kind::Text),
            ("tags", Kind::Text),
            ("organizer_email", Kind::Text),
            ("organizer_phone", Kind::Text),
            ("whatsapp_invite_link", Kind::Text),
            ("organizing_dept", Kind::Text),
            ("fest", Kind::Text),
            ("created_by", Kind::Text),
            ("auth_uuid", Kind::Text),
            ("registration_deadline", Kind::Timestamp),
            ("total_participants", Kind::Int),
            ("created_at", Kind::Timestamp),
        ],
    },
    Table {
        name: "registrations",
        key: "registration_id",
        columns: &[
            ("id", Kind::Text),
            ("registration_id", Kind::Text),
            ("event_id", Kind::Text),
            ("user_email", Kind::Text),
            ("registration_type", Kind::Text),
            ("individual_name", Kind::Text),
            ("individual_email", Kind::Text),
            ("individual_register_number", Kind::Text),
            ("team_name", Kind::Text),
            ("team_leader_name", Kind::Text),
            ("team_leader_email", Kind::Text),
            ("team_leader_register_number", Kind::Text),
            ("teammates", Kind::Text),
            ("qr_code_data", Kind::Text),
            ("qr_code_generated_at", Kind::Timestamp),
            ("created_at", Kind::Timestamp),
        ],
    },
    Table {
        name: "attendance_status",
        key: "registration_id",
        columns: &[
            ("id", Kind::Text),
            ("registration_id", Kind::Text),
            ("event_id", Kind::Text),
            ("status", Kind::Text),
            ("marked_at", Kind::Timestamp),
            ("marked_by", Kind::Text),
        ],
    },
];

enum Cell {
    Text(Option<String>),
    Int(Option<i64>),
    Real(Option<f64>),
    Timestamp(Option<NaiveDateTime>),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let sqlite_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH));

    if !sqlite_path.exists() {
        info!(path = %sqlite_path.display(), "No SQLite database found, skipping data migration");
        return Ok(());
    }

    let sqlite = open_sqlite(&sqlite_path).await?;
    info!(path = %sqlite_path.display(), "Connected to SQLite database");

    let mysql_url = mysql_url()?;
    let mysql = MySqlPoolOptions::new()
        .max_connections(2)
        .connect(&mysql_url)
        .await
        .context("connecting to MySQL")?;
    info!("Connected to MySQL database");

    for table in TABLES {
        migrate_table(&sqlite, &mysql, table)
            .await
            .with_context(|| format!("migrating table {}", table.name))?;
    }

    sqlite.close().await;
    mysql.close().await;
    info!("Data migration completed");
    Ok(())
}

async fn open_sqlite(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("opening {}", path.display()))
}

fn mysql_url() -> Result<String> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("SOCIO").separator("__"))
        .build()
        .context("loading configuration")?;

    settings
        .get_string("database.url")
        .context("database.url is not configured")
}

/// Columns of `table` the legacy file actually has
async fn legacy_columns(sqlite: &SqlitePool, table: &Table) -> Result<Vec<(&'static str, Kind)>> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", table.name))
        .fetch_all(sqlite)
        .await?;
    let present: Vec<String> = rows
        .iter()
        .filter_map(|row| row.try_get::<String, _>("name").ok())
        .collect();

    Ok(table
        .columns
        .iter()
        .filter(|(name, _)| present.iter().any(|p| p == name))
        .copied()
        .collect())
}

async fn migrate_table(sqlite: &SqlitePool, mysql: &MySqlPool, table: &Table) -> Result<()> {
    let columns = legacy_columns(sqlite, table).await?;
    if columns.is_empty() {
        info!(table = table.name, "Table not present in SQLite, skipping");
        return Ok(());
    }

    let select = format!(
        "SELECT {} FROM {}",
        columns.iter().map(|(name, kind)| select_expr(name, *kind)).collect::<Vec<_>>().join(", "),
        table.name
    );
    let insert = insert_statement(table, &columns);
    let rows = sqlx::query(&select).fetch_all(sqlite).await?;

    info!(table = table.name, rows = rows.len(), "Migrating table");
    let mut migrated = 0usize;

    for row in &rows {
        let cells = read_row(row, &columns);
        let key = row.try_get::<Option<String>, _>(table.key).ok().flatten().unwrap_or_default();

        match bind_cells(sqlx::query(&insert), cells).execute(mysql).await {
            Ok(_) => migrated += 1,
            Err(e) => warn!(table = table.name, key = %key, error = %e, "Skipping row"),
        }
    }

    info!(table = table.name, migrated = migrated, skipped = rows.len() - migrated, "Table migrated");
    Ok(())
}

fn select_expr(name: &str, kind: Kind) -> String {
    let sql_type = match kind {
        Kind::Text | Kind::Timestamp => "TEXT",
        Kind::Int => "INTEGER",
        Kind::Real => "REAL",
    };
    format!("CAST({name} AS {sql_type}) AS {name}")
}

fn insert_statement(table: &Table, columns: &[(&str, Kind)]) -> String {
    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let placeholders = vec!["?"; names.len()].join(", ");
    let updates = names
        .iter()
        .filter(|name| **name != "id" && **name != table.key)
        .map(|name| format!("{name} = VALUES({name})"))
        .collect::<Vec<_>>();

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        names.join(", "),
        placeholders
    );
    if updates.is_empty() {
        sql.push_str(&format!(" ON DUPLICATE KEY UPDATE {0} = {0}", table.key));
    } else {
        sql.push_str(&format!(" ON DUPLICATE KEY UPDATE {}", updates.join(", ")));
    }
    sql
}

fn read_row(row: &SqliteRow, columns: &[(&str, Kind)]) -> Vec<Cell> {
    columns
        .iter()
        .map(|(name, kind)| match kind {
            Kind::Text => Cell::Text(row.try_get::<Option<String>, _>(*name).ok().flatten()),
            Kind::Int => Cell::Int(row.try_get::<Option<i64>, _>(*name).ok().flatten()),
            Kind::Real => Cell::Real(row.try_get::<Option<f64>, _>(*name).ok().flatten()),
            Kind::Timestamp => Cell::Timestamp(
                row.try_get::<Option<String>, _>(*name)
                    .ok()
                    .flatten()
                    .and_then(|value| parse_timestamp(&value)),
            ),
        })
        .collect()
}

fn bind_cells<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    cells: Vec<Cell>,
) -> Query<'q, MySql, MySqlArguments> {
    for cell in cells {
        query = match cell {
            Cell::Text(value) => query.bind(value),
            Cell::Int(value) => query.bind(value),
            Cell::Real(value) => query.bind(value),
            Cell::Timestamp(value) => query.bind(value),
        };
    }
    query
}

/// SQLite stores timestamps as ISO strings, with or without offset
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
