//! SQL database sink.
//!
//! Appends one row per printer to a status table, creating the table on
//! first use. MySQL/MariaDB and SQLite URLs are supported.

use async_trait::async_trait;
use sqlx::AnyPool;
use sqlx::any::{AnyPoolOptions, install_default_drivers};

use crate::delivery::ReportSink;
use crate::error::{AppError, Result};
use crate::models::{DatabaseConfig, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => Ok(Backend::MySql),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(AppError::config(format!(
                "Unsupported database scheme {other:?}; use mysql:// or sqlite://"
            ))),
        }
    }
}

/// Status table sink.
#[derive(Debug, Clone)]
pub struct DatabaseSink {
    url: String,
    table: String,
    backend: Backend,
}

impl DatabaseSink {
    pub fn new(url: impl Into<String>, table: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let backend = Backend::from_url(&url)?;
        Ok(Self {
            url,
            table: table.into(),
            backend,
        })
    }

    /// Create a sink, resolving the connection URL from the environment.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let url = config.resolve_url().ok_or_else(|| {
            AppError::config(format!(
                "No database URL: set database.url or ${}",
                config.url_env.as_deref().unwrap_or("PRINTWATCH_DATABASE_URL")
            ))
        })?;
        Self::new(url, &config.table)
    }

    fn create_table_sql(&self) -> String {
        match self.backend {
            Backend::MySql => format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INT AUTO_INCREMENT PRIMARY KEY,
                    generated_at DATETIME,
                    printer VARCHAR(50),
                    ip VARCHAR(50),
                    status VARCHAR(10),
                    tray_status TEXT,
                    toner_levels TEXT
                )",
                self.table
            ),
            Backend::Sqlite => format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    generated_at TEXT,
                    printer TEXT,
                    ip TEXT,
                    status TEXT,
                    tray_status TEXT,
                    toner_levels TEXT
                )",
                self.table
            ),
        }
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (generated_at, printer, ip, status, tray_status, toner_levels) \
             VALUES (?, ?, ?, ?, ?, ?)",
            self.table
        )
    }

    async fn connect(&self) -> Result<AnyPool> {
        install_default_drivers();
        Ok(AnyPoolOptions::new()
            .max_connections(1)
            .connect(&self.url)
            .await?)
    }
}

#[async_trait]
impl ReportSink for DatabaseSink {
    fn name(&self) -> &str {
        "database"
    }

    async fn deliver(&self, report: &Report) -> Result<()> {
        let pool = self.connect().await?;
        sqlx::query(&self.create_table_sql()).execute(&pool).await?;

        let insert = self.insert_sql();
        let generated_at = report.timestamp();

        let mut tx = pool.begin().await?;
        for row in &report.rows {
            sqlx::query(&insert)
                .bind(generated_at.as_str())
                .bind(row.name.as_str())
                .bind(row.address.as_str())
                .bind(row.severity.marker())
                .bind(row.tray_status.as_str())
                .bind(row.toner_levels.as_str())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        pool.close().await;

        log::info!(
            "Inserted {} rows into {} ({:?})",
            report.rows.len(),
            self.table,
            self.backend
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceRow, Severity};
    use tempfile::TempDir;

    fn row(name: &str, severity: Severity) -> DeviceRow {
        DeviceRow {
            severity,
            name: name.to_string(),
            address: format!("10.0.0.{}", name.len()),
            tray_status: "Tray1: Paper Available".to_string(),
            toner_levels: "45%".to_string(),
        }
    }

    fn sqlite_url(tmp: &TempDir) -> String {
        format!("sqlite://{}?mode=rwc", tmp.path().join("status.db").display())
    }

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            Backend::from_url("mysql://u:p@localhost/printers_db").unwrap(),
            Backend::MySql
        );
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert!(Backend::from_url("postgres://localhost/db").is_err());
    }

    #[test]
    fn test_from_config_requires_url() {
        let config = DatabaseConfig {
            enabled: true,
            url: None,
            url_env: None,
            ..DatabaseConfig::default()
        };
        assert!(DatabaseSink::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_insert_rows_into_sqlite() {
        let tmp = TempDir::new().unwrap();
        let url = sqlite_url(&tmp);
        let sink = DatabaseSink::new(&url, "printer_status").unwrap();

        let report = Report::new(
            Report::now(),
            vec![row("lp2", Severity::Critical), row("clp", Severity::Ok)],
        );
        sink.deliver(&report).await.unwrap();
        sink.deliver(&report).await.unwrap();

        let pool = sink.connect().await.unwrap();
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT generated_at, printer, status FROM printer_status ORDER BY id",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].0, report.timestamp());
        assert_eq!(rows[0].1, "lp2");
        assert_eq!(rows[0].2, "❌");
        assert_eq!(rows[1].1, "clp");
        assert_eq!(rows[1].2, "✅");
    }

    #[tokio::test]
    async fn test_unreachable_database_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let url = format!(
            "sqlite://{}?mode=ro",
            tmp.path().join("missing/status.db").display()
        );
        let sink = DatabaseSink::new(url, "printer_status").unwrap();

        let report = Report::new(Report::now(), vec![row("lp2", Severity::Ok)]);
        assert!(sink.deliver(&report).await.is_err());
    }
}
