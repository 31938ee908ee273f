/// Application context and dependency injection
use crate::{
    accounts::{AdminManager, UserManager},
    appointments::AppointmentManager,
    config::ServerConfig,
    contacts::ContactManager,
    db,
    doctors::DoctorManager,
    error::ClinicResult,
    mailer::Mailer,
    notify::Notifier,
    ratings::RatingManager,
    reports::ReportManager,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub users: Arc<UserManager>,
    pub admins: Arc<AdminManager>,
    pub appointments: Arc<AppointmentManager>,
    pub contacts: Arc<ContactManager>,
    pub doctors: Arc<DoctorManager>,
    pub ratings: Arc<RatingManager>,
    pub reports: Arc<ReportManager>,
    // Email mailer
    pub mailer: Arc<Mailer>,
    // Background notification queue
    pub notifier: Arc<Notifier>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ClinicResult<Self> {
        // Validate configuration
        config.validate()?;

        // Create data directories if they don't exist
        Self::ensure_directories(&config).await?;

        // Initialize database
        let pool =
            db::create_pool(&config.database.path, db::DatabaseOptions::default()).await?;

        // Run migrations
        db::run_migrations(&pool).await?;

        // Test database connectivity
        db::test_connection(&pool).await?;

        Self::with_pool(config, pool)
    }

    /// Assemble the context around an existing pool. Tests use this with
    /// an in-memory database.
    pub fn with_pool(config: ServerConfig, pool: SqlitePool) -> ClinicResult<Self> {
        let mailer = Arc::new(Mailer::new(config.email.clone())?);
        let notifier = Arc::new(Notifier::start(mailer.clone()));

        Ok(Self {
            config: Arc::new(config),
            db: pool.clone(),
            users: Arc::new(UserManager::new(pool.clone())),
            admins: Arc::new(AdminManager::new(pool.clone())),
            appointments: Arc::new(AppointmentManager::new(pool.clone())),
            contacts: Arc::new(ContactManager::new(pool.clone())),
            doctors: Arc::new(DoctorManager::new(pool.clone())),
            ratings: Arc::new(RatingManager::new(pool.clone())),
            reports: Arc::new(ReportManager::new(pool)),
            mailer,
            notifier,
        })
    }

    /// Create data directories if they don't exist
    async fn ensure_directories(config: &ServerConfig) -> ClinicResult<()> {
        if let Some(parent) = config.database.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::create_dir_all(&config.uploads.directory).await?;
        Ok(())
    }
}
