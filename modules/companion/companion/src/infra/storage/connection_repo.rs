//! `SeaORM` repository implementation for connections.

use anyhow::Context;
use async_trait::async_trait;
use companion_sdk::{Connection, ConnectionStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::entity::connection;
use super::entity::enums::{DbConnectionStatus, DbRole};
use super::user_repo::load_users;
use crate::domain::error::DomainError;
use crate::domain::repo::{ConnectionRepository, NewConnectionRecord};

pub struct SeaOrmConnectionRepository {
    db: DatabaseConnection,
}

impl SeaOrmConnectionRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_participants(
        &self,
        rows: Vec<connection::Model>,
    ) -> anyhow::Result<Vec<Connection>> {
        let ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|r| [r.volunteer_id, r.target_id])
            .collect();
        let users = load_users(&self.db, ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let mut c = Connection::from(row);
                c.volunteer = users.get(&c.volunteer_id).cloned();
                c.target = users.get(&c.target_id).cloned();
                c
            })
            .collect())
    }
}

async fn pair_exists<C: ConnectionTrait>(
    conn: &C,
    volunteer_id: Uuid,
    target_id: Uuid,
) -> anyhow::Result<bool> {
    let count = connection::Entity::find()
        .filter(connection::Column::VolunteerId.eq(volunteer_id))
        .filter(connection::Column::TargetId.eq(target_id))
        .count(conn)
        .await
        .context("connection exists query failed")?;
    Ok(count > 0)
}

fn map_insert_error(err: DbErr) -> DomainError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        DomainError::ConnectionAlreadyExists
    } else {
        DomainError::Database(anyhow::Error::new(err).context("insert connection failed"))
    }
}

#[async_trait]
impl ConnectionRepository for SeaOrmConnectionRepository {
    #[instrument(
        name = "companion.repo.connections.create",
        skip(self, record),
        fields(
            db.operation = "INSERT",
            volunteer.id = %record.volunteer_id,
            target.id = %record.target_id
        )
    )]
    async fn create(&self, record: NewConnectionRecord) -> Result<Connection, DomainError> {
        // The unique (volunteer_id, target_id) index rejects duplicates, racing ones included.
        let now = OffsetDateTime::now_utc();
        let row = connection::ActiveModel {
            id: Set(Uuid::new_v4()),
            volunteer_id: Set(record.volunteer_id),
            target_id: Set(record.target_id),
            target_role: Set(DbRole::from(record.target_role)),
            status: Set(DbConnectionStatus::Pending),
            matched_interests: Set(i32::try_from(record.matched_interests).unwrap_or(i32::MAX)),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(map_insert_error)?;

        debug!(connection.id = %row.id, "Inserted connection");
        Ok(row.into())
    }

    #[instrument(
        name = "companion.repo.connections.find_by_id",
        skip(self),
        fields(db.operation = "SELECT", connection.id = %id)
    )]
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Connection>> {
        let Some(row) = connection::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find_by_id query failed")?
        else {
            return Ok(None);
        };
        Ok(self.with_participants(vec![row]).await?.pop())
    }

    async fn find_by_volunteer(&self, volunteer_id: Uuid) -> anyhow::Result<Vec<Connection>> {
        let rows = connection::Entity::find()
            .filter(connection::Column::VolunteerId.eq(volunteer_id))
            .order_by_desc(connection::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("find_by_volunteer query failed")?;
        self.with_participants(rows).await
    }

    async fn find_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Connection>> {
        let rows = connection::Entity::find()
            .filter(connection::Column::TargetId.eq(target_id))
            .order_by_desc(connection::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("find_by_target query failed")?;
        self.with_participants(rows).await
    }

    async fn exists(&self, volunteer_id: Uuid, target_id: Uuid) -> anyhow::Result<bool> {
        pair_exists(&self.db, volunteer_id, target_id).await
    }

    #[instrument(
        name = "companion.repo.connections.update_status",
        skip(self),
        fields(db.operation = "UPDATE", connection.id = %id, status = status.as_str())
    )]
    async fn update_status(
        &self,
        id: Uuid,
        expected_version: i32,
        status: ConnectionStatus,
    ) -> Result<(), DomainError> {
        let result = connection::Entity::update_many()
            .set(connection::ActiveModel {
                status: Set(status.into()),
                version: Set(expected_version + 1),
                updated_at: Set(OffsetDateTime::now_utc()),
                ..Default::default()
            })
            .filter(connection::Column::Id.eq(id))
            .filter(connection::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .context("update connection status failed")?;

        if result.rows_affected > 0 {
            return Ok(());
        }
        let still_there = connection::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find_by_id query failed")?
            .is_some();
        if still_there {
            Err(DomainError::stale("connection", id))
        } else {
            Err(DomainError::not_found("connection", id))
        }
    }
}
