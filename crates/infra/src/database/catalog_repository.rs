//! SQLite-backed implementation of the `CatalogRepository` port.
//!
//! Chapters and theorems are written once by the seeder and only read here.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::params;
use studysync_core::CatalogRepository;
use studysync_domain::{
    Chapter, ChapterId, Result as DomainResult, Theorem, TheoremId, TheoremSearchHit,
};
use tracing::instrument;

use super::manager::{with_connection, DbManager};
use super::rows::{map_chapter, map_theorem, CHAPTER_COLUMNS, THEOREM_COLUMNS};
use crate::errors::InfraError;

/// SQLite-backed syllabus catalog.
pub struct SqliteCatalogRepository {
    db: Arc<DbManager>,
}

impl SqliteCatalogRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn list_chapters(&self) -> DomainResult<Vec<Chapter>> {
        with_connection(&self.db, |conn| {
            let sql = format!("SELECT {CHAPTER_COLUMNS} FROM chapters ORDER BY number");
            Ok(conn.query_all(&sql, [], map_chapter).map_err(InfraError::from)?)
        })
        .await
    }

    async fn get_chapter(&self, chapter_id: ChapterId) -> DomainResult<Option<Chapter>> {
        with_connection(&self.db, move |conn| {
            let sql = format!("SELECT {CHAPTER_COLUMNS} FROM chapters WHERE id = ?1");
            Ok(conn.query_optional(&sql, params![chapter_id], map_chapter).map_err(InfraError::from)?)
        })
        .await
    }

    async fn list_theorems(&self, chapter_id: ChapterId) -> DomainResult<Vec<Theorem>> {
        with_connection(&self.db, move |conn| {
            let sql = format!(
                "SELECT {THEOREM_COLUMNS} FROM theorems t
                 WHERE t.chapter_id = ?1
                 ORDER BY t.order_index"
            );
            Ok(conn.query_all(&sql, params![chapter_id], map_theorem).map_err(InfraError::from)?)
        })
        .await
    }

    async fn get_theorem(&self, theorem_id: TheoremId) -> DomainResult<Option<Theorem>> {
        with_connection(&self.db, move |conn| {
            let sql = format!("SELECT {THEOREM_COLUMNS} FROM theorems t WHERE t.id = ?1");
            Ok(conn.query_optional(&sql, params![theorem_id], map_theorem).map_err(InfraError::from)?)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn search_theorems(
        &self,
        query: &str,
        limit: usize,
    ) -> DomainResult<Vec<TheoremSearchHit>> {
        let pattern = format!("%{}%", escape_like(query.trim()));
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        with_connection(&self.db, move |conn| {
            let sql = format!(
                "SELECT {THEOREM_COLUMNS}, ch.number, ch.title
                 FROM theorems t
                 JOIN chapters ch ON ch.id = t.chapter_id
                 WHERE t.name LIKE ?1 ESCAPE '\\' OR t.statement LIKE ?1 ESCAPE '\\'
                 ORDER BY ch.number, t.order_index
                 LIMIT ?2"
            );
            let hits = conn
                .query_all(&sql, params![pattern, limit], |row| {
                    Ok(TheoremSearchHit {
                        theorem: map_theorem(row)?,
                        chapter_number: row.get(5)?,
                        chapter_title: row.get(6)?,
                    })
                })
                .map_err(InfraError::from)?;
            Ok(hits)
        })
        .await
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
