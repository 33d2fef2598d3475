//! `SeaORM` repository implementation for the interest catalogue.

use anyhow::Context;
use async_trait::async_trait;
use companion_sdk::Interest;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::entity::interest;
use crate::domain::repo::InterestRepository;

pub struct SeaOrmInterestRepository {
    db: DatabaseConnection,
}

impl SeaOrmInterestRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InterestRepository for SeaOrmInterestRepository {
    #[instrument(
        name = "companion.repo.interests.find_all",
        skip(self),
        fields(db.operation = "SELECT")
    )]
    async fn find_all(&self) -> anyhow::Result<Vec<Interest>> {
        let rows = interest::Entity::find()
            .order_by_asc(interest::Column::Name)
            .all(&self.db)
            .await
            .context("find_all query failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Interest>> {
        let row = interest::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find_by_id query failed")?;
        Ok(row.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Interest>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = interest::Entity::find()
            .filter(interest::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(interest::Column::Name)
            .all(&self.db)
            .await
            .context("find_by_ids query failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(
        name = "companion.repo.interests.seed_defaults",
        skip_all,
        fields(db.operation = "INSERT")
    )]
    async fn seed_defaults(&self, defaults: &[(&str, &str)]) -> anyhow::Result<usize> {
        let mut inserted = 0;
        for (name, icon) in defaults {
            let existing = interest::Entity::find()
                .filter(interest::Column::Name.eq(*name))
                .one(&self.db)
                .await
                .context("seed lookup failed")?;
            if existing.is_some() {
                continue;
            }
            interest::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set((*name).to_owned()),
                icon: Set((*icon).to_owned()),
                created_at: Set(OffsetDateTime::now_utc()),
            }
            .insert(&self.db)
            .await
            .with_context(|| format!("seed insert of '{name}' failed"))?;
            inserted += 1;
        }
        debug!(inserted, "Interest seeding finished");
        Ok(inserted)
    }
}
