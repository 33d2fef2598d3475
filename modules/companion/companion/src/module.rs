//! Module wiring: database, repositories, services, router.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use companion_sdk::CompanionClientV1;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::config::{AuthConfig, CompanionConfig, DatabaseConfig};
use crate::domain::ServiceConfig;
use crate::domain::appointments::AppointmentService;
use crate::domain::auth::AuthService;
use crate::domain::interests::InterestService;
use crate::domain::matching::MatchingService;
use crate::domain::ports::{PasswordHasher, TokenIssuer};
use crate::domain::repo::{
    AppointmentRepository, ConnectionRepository, InterestRepository, UserRepository,
};
use crate::domain::users::UserService;
use crate::infra::auth::{Argon2Hasher, JwtTokenIssuer};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    SeaOrmAppointmentRepository, SeaOrmConnectionRepository, SeaOrmInterestRepository,
    SeaOrmUserRepository,
};
use crate::local_client::CompanionLocalClient;

/// The domain services, shared by the REST layer and the local client.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub interests: Arc<InterestService>,
    pub matching: Arc<MatchingService>,
    pub appointments: Arc<AppointmentService>,
}

impl Services {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        interests: Arc<dyn InterestRepository>,
        connections: Arc<dyn ConnectionRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(
                users.clone(),
                interests.clone(),
                hasher,
                tokens,
                config.clone(),
            )),
            users: Arc::new(UserService::new(
                users.clone(),
                interests.clone(),
                config.clone(),
            )),
            interests: Arc::new(InterestService::new(interests)),
            matching: Arc::new(MatchingService::new(users.clone(), connections)),
            appointments: Arc::new(AppointmentService::new(
                users,
                appointments,
                config.clone(),
            )),
        }
    }
}

/// Opens the pool and brings the schema up to date.
pub async fn connect_database(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.dsn.clone());
    // Every pooled connection to an in-memory SQLite database sees its own empty database.
    let max_connections = if cfg.dsn.contains(":memory:") {
        1
    } else {
        cfg.max_connections.max(1)
    };
    opts.max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to database '{}'", redact_dsn(&cfg.dsn)))?;
    Migrator::up(&db, None)
        .await
        .context("failed to run companion migrations")?;
    info!(max_connections, "database ready");
    Ok(db)
}

fn redact_dsn(dsn: &str) -> String {
    match (dsn.find("://"), dsn.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***{}", &dsn[..scheme], &dsn[at..])
        }
        _ => dsn.to_owned(),
    }
}

/// Companion module.
///
/// Owns the database handle and the services built on top of it.
pub struct CompanionModule {
    db: DatabaseConnection,
    services: Services,
}

impl CompanionModule {
    /// Wires the SeaORM repositories and the argon2/JWT adapters into the
    /// services and seeds the interest catalogue when configured.
    pub async fn init(
        db: DatabaseConnection,
        cfg: &CompanionConfig,
        auth: &AuthConfig,
    ) -> anyhow::Result<Self> {
        info!("Initializing companion module");

        let users = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let interests = Arc::new(SeaOrmInterestRepository::new(db.clone()));
        let connections = Arc::new(SeaOrmConnectionRepository::new(db.clone()));
        let appointments = Arc::new(SeaOrmAppointmentRepository::new(db.clone()));

        let services = Services::new(
            users,
            interests,
            connections,
            appointments,
            Arc::new(Argon2Hasher::default()),
            Arc::new(JwtTokenIssuer::new(auth)),
            &ServiceConfig::from(cfg),
        );

        if cfg.seed_interests {
            let inserted = services
                .interests
                .seed_defaults()
                .await
                .context("failed to seed interests")?;
            info!(inserted, "interest catalogue seeded");
        }

        Ok(Self { db, services })
    }

    #[must_use]
    pub fn services(&self) -> &Services {
        &self.services
    }

    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(&self.services)
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn CompanionClientV1> {
        Arc::new(CompanionLocalClient::new(self.services.clone()))
    }
}
