use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

/// SQLite-backed persistence for last observed prices and the priority set.
///
/// Every method is a single self-committing statement; there is no
/// multi-statement transaction anywhere in the workflow.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at `path` and ensure both tables exist.
    /// Pass `":memory:"` for an ephemeral database (useful for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS precos (
                ticker TEXT PRIMARY KEY,
                preco  REAL
            );

            CREATE TABLE IF NOT EXISTS prioritarios (
                ticker TEXT PRIMARY KEY
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn normalize(ticker: &str) -> String {
        ticker.trim().to_uppercase()
    }

    /// Last price recorded for `ticker`, if any report has seen it before.
    pub fn last_price(&self, ticker: &str) -> Result<Option<f64>> {
        self.conn()
            .query_row(
                "SELECT preco FROM precos WHERE ticker = ?1",
                params![Self::normalize(ticker)],
                |row| row.get(0),
            )
            .optional()
            .context("failed to read last price")
    }

    /// Upsert the price observed for `ticker` in the current report cycle.
    pub fn set_price(&self, ticker: &str, price: f64) -> Result<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO precos (ticker, preco) VALUES (?1, ?2)",
                params![Self::normalize(ticker), price],
            )
            .context("failed to upsert price")?;
        Ok(())
    }

    /// All priority tickers. Membership is a set; the sort is only for
    /// stable output.
    pub fn priority_list(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT ticker FROM prioritarios ORDER BY ticker")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("failed to list priority tickers")
    }

    /// Add a ticker to the priority set.
    /// Returns true if it was newly added.
    pub fn add_priority(&self, ticker: &str) -> Result<bool> {
        let added = self
            .conn()
            .execute(
                "INSERT OR IGNORE INTO prioritarios (ticker) VALUES (?1)",
                params![Self::normalize(ticker)],
            )
            .context("failed to add priority ticker")?;
        Ok(added == 1)
    }

    /// Remove a ticker from the priority set.
    /// Returns true if it existed.
    pub fn remove_priority(&self, ticker: &str) -> Result<bool> {
        let removed = self
            .conn()
            .execute(
                "DELETE FROM prioritarios WHERE ticker = ?1",
                params![Self::normalize(ticker)],
            )
            .context("failed to remove priority ticker")?;
        Ok(removed == 1)
    }
}
