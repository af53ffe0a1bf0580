//! In-memory store implementing every study port
//!
//! One `Mutex<State>` behind all four traits so a single instance can be
//! handed to `StudyService` as catalog, confidence, session and stats store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studysync_core::{
    CatalogRepository, ConfidenceRepository, StatsRepository, StudySessionRepository,
};
use studysync_domain::{
    Chapter, ChapterId, ChapterStats, ConfidenceRating, ConfidenceScore, ImportSummary,
    NewStudySession, OverallStats, Result as DomainResult, SessionKind, StudyExport, StudySession,
    StudySyncError, Theorem, TheoremId, TheoremSearchHit,
};

#[derive(Default)]
struct State {
    chapters: Vec<Chapter>,
    theorems: Vec<Theorem>,
    ratings: BTreeMap<TheoremId, ConfidenceRating>,
    sessions: Vec<StudySession>,
}

#[derive(Default, Clone)]
pub struct InMemoryStudyStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStudyStore {
    /// Two chapters: chapter 1 with theorems 1..=3, chapter 2 with theorem 4.
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            state.chapters = vec![
                Chapter { id: 1, number: 1, title: "The Real Numbers".into() },
                Chapter { id: 2, number: 2, title: "Sequences and Limits".into() },
            ];
            state.theorems = [(1, 1, "Least Upper Bound Property"), (2, 1, "Archimedean Property"),
                (3, 1, "Density of the Rationals"), (4, 2, "Squeeze Theorem")]
                .into_iter()
                .enumerate()
                .map(|(i, (id, chapter_id, name))| Theorem {
                    id,
                    chapter_id,
                    name: name.into(),
                    statement: format!("Statement of {name}"),
                    order_index: i as u32,
                })
                .collect();
        }
        store
    }

    pub fn sessions(&self) -> Vec<StudySession> {
        self.state.lock().unwrap().sessions.clone()
    }

    pub fn rating(&self, theorem_id: TheoremId) -> Option<ConfidenceRating> {
        self.state.lock().unwrap().ratings.get(&theorem_id).cloned()
    }

    pub fn insert_session(&self, session: NewStudySession) -> StudySession {
        insert_session(&mut self.state.lock().unwrap(), session)
    }
}

fn insert_session(state: &mut State, session: NewStudySession) -> StudySession {
    let stored = StudySession {
        id: state.sessions.len() as i64 + 1,
        theorem_id: session.theorem_id,
        scheduled_at: session.scheduled_at,
        duration_minutes: session.duration_minutes,
        calendar_event_id: session.calendar_event_id,
        kind: session.kind,
        created_at: Utc::now(),
    };
    state.sessions.push(stored.clone());
    stored
}

#[async_trait]
impl CatalogRepository for InMemoryStudyStore {
    async fn list_chapters(&self) -> DomainResult<Vec<Chapter>> {
        Ok(self.state.lock().unwrap().chapters.clone())
    }

    async fn get_chapter(&self, chapter_id: ChapterId) -> DomainResult<Option<Chapter>> {
        Ok(self.state.lock().unwrap().chapters.iter().find(|c| c.id == chapter_id).cloned())
    }

    async fn list_theorems(&self, chapter_id: ChapterId) -> DomainResult<Vec<Theorem>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .theorems
            .iter()
            .filter(|t| t.chapter_id == chapter_id)
            .cloned()
            .collect())
    }

    async fn get_theorem(&self, theorem_id: TheoremId) -> DomainResult<Option<Theorem>> {
        Ok(self.state.lock().unwrap().theorems.iter().find(|t| t.id == theorem_id).cloned())
    }

    async fn search_theorems(
        &self,
        query: &str,
        limit: usize,
    ) -> DomainResult<Vec<TheoremSearchHit>> {
        let state = self.state.lock().unwrap();
        let needle = query.to_lowercase();
        Ok(state
            .theorems
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .take(limit)
            .filter_map(|t| {
                let chapter = state.chapters.iter().find(|c| c.id == t.chapter_id)?;
                Some(TheoremSearchHit {
                    theorem: t.clone(),
                    chapter_number: chapter.number,
                    chapter_title: chapter.title.clone(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl ConfidenceRepository for InMemoryStudyStore {
    async fn upsert_confidence(
        &self,
        theorem_id: TheoremId,
        score: i64,
        rated_at: DateTime<Utc>,
    ) -> DomainResult<ConfidenceRating> {
        let score = ConfidenceScore::new(score)?;
        let mut state = self.state.lock().unwrap();
        if !state.theorems.iter().any(|t| t.id == theorem_id) {
            return Err(StudySyncError::Validation(format!("unknown theorem {theorem_id}")));
        }
        let rating = ConfidenceRating { theorem_id, score, updated_at: rated_at };
        state.ratings.insert(theorem_id, rating.clone());
        Ok(rating)
    }

    async fn get_confidence(&self, theorem_id: TheoremId) -> DomainResult<Option<ConfidenceRating>> {
        Ok(self.rating(theorem_id))
    }

    async fn list_confidence_for_chapter(
        &self,
        chapter_id: ChapterId,
    ) -> DomainResult<Vec<ConfidenceRating>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .theorems
            .iter()
            .filter(|t| t.chapter_id == chapter_id)
            .filter_map(|t| state.ratings.get(&t.id).cloned())
            .collect())
    }

    async fn record_rating_with_review(
        &self,
        theorem_id: TheoremId,
        score: ConfidenceScore,
        rated_at: DateTime<Utc>,
        review: NewStudySession,
    ) -> DomainResult<(ConfidenceRating, StudySession)> {
        let mut state = self.state.lock().unwrap();
        let rating = ConfidenceRating { theorem_id, score, updated_at: rated_at };
        state.ratings.insert(theorem_id, rating.clone());
        let session = insert_session(&mut state, review);
        Ok((rating, session))
    }
}

#[async_trait]
impl StudySessionRepository for InMemoryStudyStore {
    async fn create_study_session(&self, session: NewStudySession) -> DomainResult<StudySession> {
        Ok(self.insert_session(session))
    }

    async fn latest_primary_session(
        &self,
        theorem_id: TheoremId,
    ) -> DomainResult<Option<StudySession>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .sessions
            .iter()
            .filter(|s| s.theorem_id == theorem_id && s.kind == SessionKind::Primary)
            .max_by_key(|s| s.scheduled_at)
            .cloned())
    }

    async fn list_sessions(&self, theorem_id: Option<TheoremId>) -> DomainResult<Vec<StudySession>> {
        let mut sessions: Vec<_> = self
            .sessions()
            .into_iter()
            .filter(|s| theorem_id.map_or(true, |id| s.theorem_id == id))
            .collect();
        sessions.sort_by_key(|s| s.scheduled_at);
        Ok(sessions)
    }
}

#[async_trait]
impl StatsRepository for InMemoryStudyStore {
    async fn get_stats(&self, chapter_id: ChapterId) -> DomainResult<ChapterStats> {
        let state = self.state.lock().unwrap();
        let scores: Vec<f64> = state
            .theorems
            .iter()
            .filter(|t| t.chapter_id == chapter_id)
            .filter_map(|t| state.ratings.get(&t.id))
            .map(|r| f64::from(r.score.value()))
            .collect();
        let theorem_count = state.theorems.iter().filter(|t| t.chapter_id == chapter_id).count();

        Ok(ChapterStats {
            chapter_id,
            theorem_count: theorem_count as u32,
            rated_count: scores.len() as u32,
            average_confidence: (!scores.is_empty())
                .then(|| scores.iter().sum::<f64>() / scores.len() as f64),
        })
    }

    async fn get_overall_stats(&self, now: DateTime<Utc>) -> DomainResult<OverallStats> {
        let state = self.state.lock().unwrap();
        let count_kind =
            |kind: SessionKind| state.sessions.iter().filter(|s| s.kind == kind).count() as u32;
        let total: u32 = state.ratings.values().map(|r| u32::from(r.score.value())).sum();

        Ok(OverallStats {
            chapter_count: state.chapters.len() as u32,
            theorem_count: state.theorems.len() as u32,
            rated_count: state.ratings.len() as u32,
            average_confidence: (!state.ratings.is_empty())
                .then(|| f64::from(total) / state.ratings.len() as f64),
            low_confidence_count: state.ratings.values().filter(|r| r.score.needs_review()).count()
                as u32,
            primary_sessions: count_kind(SessionKind::Primary),
            review_sessions: count_kind(SessionKind::Review),
            upcoming_sessions: state.sessions.iter().filter(|s| s.scheduled_at > now).count()
                as u32,
        })
    }

    async fn export_snapshot(&self, exported_at: DateTime<Utc>) -> DomainResult<StudyExport> {
        let state = self.state.lock().unwrap();
        Ok(StudyExport {
            exported_at,
            ratings: state.ratings.values().cloned().collect(),
            sessions: state.sessions.clone(),
        })
    }
    async fn import_snapshot(&self, snapshot: StudyExport) -> DomainResult<ImportSummary> {
        let mut state = self.state.lock().unwrap();
        let referenced = snapshot
            .ratings
            .iter()
            .map(|r| r.theorem_id)
            .chain(snapshot.sessions.iter().map(|s| s.theorem_id));
        for theorem_id in referenced {
            if !state.theorems.iter().any(|t| t.id == theorem_id) {
                return Err(StudySyncError::Validation(format!("unknown theorem {theorem_id}")));
            }
        }

        let mut summary = ImportSummary::default();
        for rating in snapshot.ratings {
            state.ratings.insert(rating.theorem_id, rating);
            summary.ratings += 1;
        }
        for session in snapshot.sessions {
            if state.sessions.iter().any(|s| s.calendar_event_id == session.calendar_event_id) {
                summary.skipped_sessions += 1;
                continue;
            }
            let id = state.sessions.len() as i64 + 1;
            state.sessions.push(StudySession { id, ..session });
            summary.sessions += 1;
        }
        Ok(summary)
    }
}
