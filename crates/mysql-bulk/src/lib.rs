//! Size-bounded multi-row statement execution for MySQL.
//!
//! [`BulkConnection`] wraps one `mysql_async` connection and turns
//! column-oriented value batches into chunked multi-row INSERT (plain,
//! upsert and ignore variants) and batched key deletes, plus thin
//! single-statement read helpers. Chunking keeps every statement under a
//! fixed row budget so arbitrarily large batches never exceed the
//! server's request size limit; each chunk is one round trip.
//!
//! # Failure model
//!
//! A failing statement surfaces as a [`BulkError`] for that chunk. The
//! engine does not retry and cannot tell which row inside the chunk was
//! at fault; callers are expected to validate and pre-filter rows before
//! flattening them into a batch. Chunks already executed stay executed.
//! Misaligned value buffers and zero-column statements are programming
//! errors and panic.

mod error;
pub mod statement;

use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, Params, Row};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub use error::BulkError;
pub use mysql_async::Value;

/// Default row budget per statement, a conservative stand-in for the
/// server's maximum request size.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Execution time above which a statement is logged at warn level.
const SLOW_STATEMENT: Duration = Duration::from_millis(100);

/// A single MySQL connection with chunked bulk-write operations.
///
/// One import run owns one `BulkConnection`; the engine holds no state
/// between calls besides the connection itself, and chunks are submitted
/// strictly in order because chunk order matters for upsert and ignore
/// semantics when rows of the same entity collide across chunks.
pub struct BulkConnection {
    conn: Conn,
    chunk_size: usize,
}

impl BulkConnection {
    /// Connect with the default chunk size.
    pub async fn connect(url: &str) -> Result<Self, BulkError> {
        Self::connect_with_chunk_size(url, DEFAULT_CHUNK_SIZE).await
    }

    /// Connect with an explicit row budget per statement.
    pub async fn connect_with_chunk_size(url: &str, chunk_size: usize) -> Result<Self, BulkError> {
        let opts = Opts::from_url(url).map_err(mysql_async::Error::from)?;
        let conn = Conn::new(opts).await?;
        Ok(Self::from_conn(conn, chunk_size))
    }

    /// Wrap an existing connection.
    pub fn from_conn(conn: Conn, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be at least one row");
        BulkConnection { conn, chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Cleanly close the connection.
    pub async fn disconnect(self) -> Result<(), BulkError> {
        self.conn.disconnect().await?;
        Ok(())
    }

    /// Execute one parameterized statement. All caller data flows through
    /// positional placeholders; this is the only execution primitive the
    /// write operations use.
    pub async fn execute(&mut self, query: &str, params: Vec<Value>) -> Result<(), BulkError> {
        let started = Instant::now();
        self.conn.exec_drop(query, params_of(params)).await?;
        let elapsed = started.elapsed();
        if elapsed >= SLOW_STATEMENT {
            let prefix: String = query.chars().take(120).collect();
            warn!(?elapsed, query = %prefix, "slow statement");
        } else {
            debug!(?elapsed, "statement executed");
        }
        Ok(())
    }

    /// Append every row of the batch; no conflict handling. `values` is a
    /// flat row-major buffer whose length must be a multiple of the
    /// column count.
    pub async fn insert_many(
        &mut self,
        table: &str,
        columns: &[&str],
        values: Vec<Value>,
    ) -> Result<(), BulkError> {
        let head = format!(
            "INSERT INTO `{table}` ({}) VALUES ",
            statement::quoted_columns(columns)
        );
        self.grouped_execute(&head, "", columns.len(), values).await
    }

    /// Append rows; on a primary or unique key conflict, apply
    /// `update_clause` to the existing row instead of failing the
    /// statement. The clause is an opaque `ON DUPLICATE KEY UPDATE`
    /// fragment and is not parsed or validated here.
    pub async fn insert_many_upsert(
        &mut self,
        table: &str,
        columns: &[&str],
        values: Vec<Value>,
        update_clause: &str,
    ) -> Result<(), BulkError> {
        let head = format!(
            "INSERT INTO `{table}` ({}) VALUES ",
            statement::quoted_columns(columns)
        );
        let tail = format!(" ON DUPLICATE KEY UPDATE {update_clause}");
        self.grouped_execute(&head, &tail, columns.len(), values).await
    }

    /// Append rows, silently skipping any row that conflicts with an
    /// existing one.
    pub async fn insert_many_ignore(
        &mut self,
        table: &str,
        columns: &[&str],
        values: Vec<Value>,
    ) -> Result<(), BulkError> {
        let head = format!(
            "INSERT IGNORE INTO `{table}` ({}) VALUES ",
            statement::quoted_columns(columns)
        );
        self.grouped_execute(&head, "", columns.len(), values).await
    }

    /// Delete all rows whose key column matches any of `keys`, chunking
    /// over the key list.
    pub async fn delete_many(
        &mut self,
        table: &str,
        key_column: &str,
        keys: Vec<Value>,
    ) -> Result<(), BulkError> {
        let chunk_size = self.chunk_size;
        for chunk in statement::key_chunks(&keys, chunk_size) {
            let sql = format!(
                "DELETE FROM `{table}` WHERE `{key_column}` IN ({})",
                statement::marks(chunk.len())
            );
            self.execute(&sql, chunk.to_vec()).await?;
        }
        Ok(())
    }

    /// As [`delete_many`](Self::delete_many), with an additional boolean
    /// condition ANDed into every chunk's statement. The condition is an
    /// opaque fragment; values it needs must be literal-free and come
    /// from trusted code, not caller data.
    pub async fn delete_many_where(
        &mut self,
        table: &str,
        key_column: &str,
        keys: Vec<Value>,
        extra_condition: &str,
    ) -> Result<(), BulkError> {
        let chunk_size = self.chunk_size;
        for chunk in statement::key_chunks(&keys, chunk_size) {
            let sql = format!(
                "DELETE FROM `{table}` WHERE `{key_column}` IN ({}) AND {extra_condition}",
                statement::marks(chunk.len())
            );
            self.execute(&sql, chunk.to_vec()).await?;
        }
        Ok(())
    }

    /// First cell of the first result row, `None` when the query matches
    /// nothing.
    pub async fn fetch_scalar<T>(&mut self, query: &str, params: Vec<Value>) -> Result<Option<T>, BulkError>
    where
        T: FromRow + Send + 'static,
    {
        Ok(self.conn.exec_first(query, params_of(params)).await?)
    }

    /// First cell of every result row.
    pub async fn fetch_column<T>(&mut self, query: &str, params: Vec<Value>) -> Result<Vec<T>, BulkError>
    where
        T: FromRow + Send + 'static,
    {
        Ok(self.conn.exec(query, params_of(params)).await?)
    }

    /// Key-value map built from the first two select fields.
    pub async fn fetch_map<K, V>(
        &mut self,
        query: &str,
        params: Vec<Value>,
    ) -> Result<HashMap<K, V>, BulkError>
    where
        K: FromValue + Eq + std::hash::Hash + Send + 'static,
        V: FromValue + Send + 'static,
    {
        let pairs: Vec<(K, V)> = self.conn.exec(query, params_of(params)).await?;
        Ok(pairs.into_iter().collect())
    }

    /// First result row, `None` when the query matches nothing.
    pub async fn fetch_row(&mut self, query: &str, params: Vec<Value>) -> Result<Option<Row>, BulkError> {
        Ok(self.conn.exec_first(query, params_of(params)).await?)
    }

    /// All result rows. No chunking: result sizes are assumed
    /// caller-bounded.
    pub async fn fetch_rows(&mut self, query: &str, params: Vec<Value>) -> Result<Vec<Row>, BulkError> {
        Ok(self.conn.exec(query, params_of(params)).await?)
    }

    /// Identity generated by the last INSERT on this connection.
    pub fn last_insert_id(&self) -> Option<u64> {
        self.conn.last_insert_id()
    }

    /// Execute a grouped statement in row-budgeted chunks. The final
    /// chunk may be shorter; an empty batch executes nothing.
    async fn grouped_execute(
        &mut self,
        head: &str,
        tail: &str,
        column_count: usize,
        values: Vec<Value>,
    ) -> Result<(), BulkError> {
        let chunk_size = self.chunk_size;
        for chunk in statement::row_chunks(&values, column_count, chunk_size) {
            let sql = format!(
                "{head}{}{tail}",
                statement::row_group_marks(column_count, chunk.len() / column_count)
            );
            self.execute(&sql, chunk.to_vec()).await?;
        }
        Ok(())
    }
}

fn params_of(params: Vec<Value>) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params)
    }
}
