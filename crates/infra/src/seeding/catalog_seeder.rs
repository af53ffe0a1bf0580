//! Seeds the fixed syllabus into an empty store.
//!
//! Runs synchronously during startup, after migrations and before the
//! listener binds. The whole catalog is written in one transaction, so a
//! crash mid-seed leaves the store empty and the next start retries.

use rusqlite::params;
use studysync_domain::catalog::{self, CatalogChapter};
use studysync_domain::Result;
use tracing::{info, instrument};

use crate::database::DbManager;
use crate::errors::InfraError;

/// What [`seed_catalog`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { chapters: usize, theorems: usize },
    AlreadySeeded,
}

/// Insert the shipped syllabus if the store has no chapters yet.
///
/// # Errors
/// `Internal` if the static catalog is malformed, `Database` on write
/// failure.
pub fn seed_catalog(db: &DbManager) -> Result<SeedOutcome> {
    seed_chapters(db, catalog::syllabus())
}

/// Insert `chapters` if the store has no chapters yet.
#[instrument(skip_all, fields(chapters = chapters.len()))]
pub fn seed_chapters(db: &DbManager, chapters: &[CatalogChapter]) -> Result<SeedOutcome> {
    catalog::validate(chapters)?;

    let mut conn = db.get_connection()?;
    let tx = conn.transaction().map_err(InfraError::from)?;

    let existing: i64 = tx
        .query_row("SELECT COUNT(*) FROM chapters", [], |row| row.get(0))
        .map_err(InfraError::from)?;
    if existing > 0 {
        info!(existing, "Catalog already seeded");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let mut theorem_total = 0;
    {
        let mut insert_chapter = tx
            .prepare("INSERT INTO chapters (number, title) VALUES (?1, ?2)")
            .map_err(InfraError::from)?;
        let mut insert_theorem = tx
            .prepare(
                "INSERT INTO theorems (chapter_id, name, statement, order_index)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(InfraError::from)?;

        for chapter in chapters {
            let chapter_id = insert_chapter
                .insert(params![chapter.number, chapter.title])
                .map_err(InfraError::from)?;

            for (order_index, theorem) in (0_i64..).zip(chapter.theorems) {
                insert_theorem
                    .execute(params![chapter_id, theorem.name, theorem.statement, order_index])
                    .map_err(InfraError::from)?;
            }
            theorem_total += chapter.theorems.len();
        }
    }

    tx.commit().map_err(InfraError::from)?;

    info!(chapters = chapters.len(), theorems = theorem_total, "Catalog seeded");
    Ok(SeedOutcome::Seeded { chapters: chapters.len(), theorems: theorem_total })
}
