#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

//! Shared helpers for the SQLite-backed integration tests.

use companion::DatabaseConfig;
use companion::connect_database;
use companion::domain::repo::{NewUserRecord, UserRepository};
use companion::infra::storage::SeaOrmUserRepository;
use companion_sdk::{Role, User};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;
use uuid::Uuid;

/// A migrated database living in a temporary directory.
///
/// Keep the struct alive for the duration of the test; dropping it removes the file.
pub struct TestDb {
    pub db: DatabaseConnection,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("companion.db");
    let cfg = DatabaseConfig {
        dsn: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 4,
    };
    let db = connect_database(&cfg).await.expect("connect + migrate");
    TestDb { db, _dir: dir }
}

pub async fn create_user(
    db: &DatabaseConnection,
    name: &str,
    role: Role,
    interest_ids: &[Uuid],
) -> User {
    SeaOrmUserRepository::new(db.clone())
        .create(NewUserRecord {
            name: name.to_owned(),
            email: format!("{}@example.org", name.to_lowercase()),
            password_hash: "not-a-real-hash".to_owned(),
            age: None,
            bio: None,
            role,
            interest_ids: interest_ids.to_vec(),
        })
        .await
        .expect("create user")
}
