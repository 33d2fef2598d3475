//! `SeaORM` repository implementation for appointments.

use anyhow::Context;
use async_trait::async_trait;
use companion_sdk::{Appointment, AppointmentStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Select,
};
use time::{Duration, OffsetDateTime, UtcOffset};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::entity::appointment;
use super::entity::enums::{DbAppointmentStatus, DbRole};
use super::user_repo::load_users;
use crate::domain::error::DomainError;
use crate::domain::repo::{AppointmentRepository, NewAppointmentRecord};

pub struct SeaOrmAppointmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAppointmentRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Runs `query` ordered by date. SQLite compares the stored timestamps as text,
    /// which is exact only to the second, so the final order is settled here.
    async fn rows(
        &self,
        query: Select<appointment::Entity>,
    ) -> anyhow::Result<Vec<appointment::Model>> {
        let mut rows = query
            .order_by_asc(appointment::Column::Date)
            .all(&self.db)
            .await
            .context("appointment list query failed")?;
        rows.sort_by_key(|r| r.date);
        debug!(count = rows.len(), "Loaded appointments");
        Ok(rows)
    }

    async fn list(&self, query: Select<appointment::Entity>) -> anyhow::Result<Vec<Appointment>> {
        let rows = self.rows(query).await?;
        self.with_participants(rows).await
    }

    async fn with_participants(
        &self,
        rows: Vec<appointment::Model>,
    ) -> anyhow::Result<Vec<Appointment>> {
        let ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|r| [r.volunteer_id, r.target_id])
            .collect();
        let users = load_users(&self.db, ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let mut a = Appointment::from(row);
                a.volunteer = users.get(&a.volunteer_id).cloned();
                a.target = users.get(&a.target_id).cloned();
                a
            })
            .collect())
    }

    /// Distinguishes a lost compare-and-swap from a deleted row.
    async fn miss(&self, id: Uuid) -> DomainError {
        match appointment::Entity::find_by_id(id).one(&self.db).await {
            Ok(Some(_)) => DomainError::stale("appointment", id),
            Ok(None) => DomainError::not_found("appointment", id),
            Err(e) => {
                DomainError::Database(anyhow::Error::new(e).context("find_by_id query failed"))
            }
        }
    }
}

#[async_trait]
impl AppointmentRepository for SeaOrmAppointmentRepository {
    #[instrument(
        name = "companion.repo.appointments.create",
        skip(self, record),
        fields(
            db.operation = "INSERT",
            volunteer.id = %record.volunteer_id,
            target.id = %record.target_id
        )
    )]
    async fn create(&self, record: NewAppointmentRecord) -> anyhow::Result<Uuid> {
        let now = OffsetDateTime::now_utc();
        let row = appointment::ActiveModel {
            id: Set(Uuid::new_v4()),
            volunteer_id: Set(record.volunteer_id),
            target_id: Set(record.target_id),
            target_role: Set(DbRole::from(record.target_role)),
            date: Set(record.date.to_offset(UtcOffset::UTC)),
            duration_minutes: Set(record.duration_minutes),
            status: Set(DbAppointmentStatus::Pending),
            meeting_url: Set(None),
            notes: Set(record.notes),
            rating: Set(None),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .context("insert appointment failed")?;
        debug!(appointment.id = %row.id, "Inserted appointment");
        Ok(row.id)
    }

    #[instrument(
        name = "companion.repo.appointments.find_by_id",
        skip(self),
        fields(db.operation = "SELECT", appointment.id = %id)
    )]
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        let Some(row) = appointment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find_by_id query failed")?
        else {
            return Ok(None);
        };
        Ok(self.with_participants(vec![row]).await?.pop())
    }

    async fn find_by_volunteer(&self, volunteer_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        self.list(
            appointment::Entity::find()
                .filter(appointment::Column::VolunteerId.eq(volunteer_id)),
        )
        .await
    }

    async fn find_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        self.list(appointment::Entity::find().filter(appointment::Column::TargetId.eq(target_id)))
            .await
    }

    #[instrument(
        name = "companion.repo.appointments.find_upcoming",
        skip(self),
        fields(db.operation = "SELECT", user.id = %user_id)
    )]
    async fn find_upcoming(
        &self,
        user_id: Uuid,
        now: OffsetDateTime,
    ) -> anyhow::Result<Vec<Appointment>> {
        let now = now.to_offset(UtcOffset::UTC);
        // Widened by a second in SQL; the exact cut happens on the decoded dates.
        let mut rows = self
            .rows(
                appointment::Entity::find()
                    .filter(
                        Condition::any()
                            .add(appointment::Column::VolunteerId.eq(user_id))
                            .add(appointment::Column::TargetId.eq(user_id)),
                    )
                    .filter(appointment::Column::Date.gt(now - Duration::seconds(1)))
                    .filter(appointment::Column::Status.eq(DbAppointmentStatus::Confirmed)),
            )
            .await?;
        rows.retain(|r| r.date > now);
        self.with_participants(rows).await
    }

    async fn find_pending_by_target(&self, target_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        self.list(
            appointment::Entity::find()
                .filter(appointment::Column::TargetId.eq(target_id))
                .filter(appointment::Column::Status.eq(DbAppointmentStatus::Pending)),
        )
        .await
    }

    async fn find_pending_by_volunteer(
        &self,
        volunteer_id: Uuid,
    ) -> anyhow::Result<Vec<Appointment>> {
        self.list(
            appointment::Entity::find()
                .filter(appointment::Column::VolunteerId.eq(volunteer_id))
                .filter(appointment::Column::Status.eq(DbAppointmentStatus::Pending)),
        )
        .await
    }

    #[instrument(
        name = "companion.repo.appointments.update",
        skip(self, a),
        fields(db.operation = "UPDATE", appointment.id = %a.id, version = a.version)
    )]
    async fn update(&self, a: &Appointment) -> Result<(), DomainError> {
        let result = appointment::Entity::update_many()
            .set(appointment::ActiveModel {
                date: Set(a.date.to_offset(UtcOffset::UTC)),
                duration_minutes: Set(a.duration_minutes),
                status: Set(a.status.into()),
                meeting_url: Set(a.meeting_url.clone()),
                notes: Set(a.notes.clone()),
                rating: Set(a.rating.map(i32::from)),
                version: Set(a.version + 1),
                updated_at: Set(OffsetDateTime::now_utc()),
                ..Default::default()
            })
            .filter(appointment::Column::Id.eq(a.id))
            .filter(appointment::Column::Version.eq(a.version))
            .exec(&self.db)
            .await
            .context("update appointment failed")?;

        if result.rows_affected == 0 {
            return Err(self.miss(a.id).await);
        }
        Ok(())
    }

    #[instrument(
        name = "companion.repo.appointments.update_status",
        skip(self),
        fields(db.operation = "UPDATE", appointment.id = %id, status = status.as_str())
    )]
    async fn update_status(
        &self,
        id: Uuid,
        expected_version: i32,
        status: AppointmentStatus,
    ) -> Result<(), DomainError> {
        let result = appointment::Entity::update_many()
            .set(appointment::ActiveModel {
                status: Set(status.into()),
                version: Set(expected_version + 1),
                updated_at: Set(OffsetDateTime::now_utc()),
                ..Default::default()
            })
            .filter(appointment::Column::Id.eq(id))
            .filter(appointment::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .context("update appointment status failed")?;

        if result.rows_affected == 0 {
            return Err(self.miss(id).await);
        }
        Ok(())
    }
}
