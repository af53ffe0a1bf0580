//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use studysync_core::{CalendarGateway, StudyService, StudySettings};
use studysync_domain::{Config, Result};
use studysync_infra::{
    seed_catalog, DbManager, GoogleCalendarGateway, HttpClient, SeedOutcome,
    SqliteCatalogRepository, SqliteConfidenceRepository, SqliteStatsRepository,
    SqliteStudySessionRepository,
};
use tracing::info;

use crate::session::SessionStore;
use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub study: Arc<StudyService>,
    pub calendar: Arc<dyn CalendarGateway>,
    pub sessions: Arc<SessionStore>,
}

impl AppContext {
    /// Open the store, migrate, seed, and wire the Google calendar adapter.
    ///
    /// # Errors
    /// Fails on a bad session key, an unusable database or a malformed
    /// catalog. Startup should abort.
    pub fn new(config: Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.calendar.request_timeout_secs))
            .build()?;
        let calendar: Arc<dyn CalendarGateway> =
            Arc::new(GoogleCalendarGateway::new(&config.calendar, http));
        Self::with_calendar(config, calendar)
    }

    /// Same as [`AppContext::new`] with a caller-supplied calendar gateway.
    pub fn with_calendar(config: Config, calendar: Arc<dyn CalendarGateway>) -> Result<Self> {
        let sessions = Arc::new(SessionStore::new(&config.session)?);

        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;
        match seed_catalog(&db)? {
            SeedOutcome::Seeded { chapters, theorems } => {
                info!(chapters, theorems, "Fresh database seeded");
            }
            SeedOutcome::AlreadySeeded => {}
        }

        let study = Arc::new(StudyService::new(
            Arc::new(SqliteCatalogRepository::new(Arc::clone(&db))),
            Arc::new(SqliteConfidenceRepository::new(Arc::clone(&db))),
            Arc::new(SqliteStudySessionRepository::new(Arc::clone(&db))),
            Arc::new(SqliteStatsRepository::new(Arc::clone(&db))),
            Arc::clone(&calendar),
            StudySettings::from(&config.study),
        ));

        info!(db_path = %db.path().display(), "Application context ready");
        Ok(Self { config, db, study, calendar, sessions })
    }

    /// Component health for `/health`.
    pub fn health_check(&self) -> HealthStatus {
        let db = self.db.health_check();
        let database = if db.healthy {
            ComponentHealth::healthy("database")
        } else {
            ComponentHealth::unhealthy(
                "database",
                db.message.unwrap_or_else(|| "database unavailable".to_string()),
            )
        };

        HealthStatus::new()
            .add_component(database)
            .add_component(
                ComponentHealth::healthy("sessions")
                    .with_message(format!("{} active", self.sessions.len())),
            )
    }
}
