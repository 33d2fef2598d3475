//! `SeaORM` repository implementation for users and their interests.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use async_trait::async_trait;
use companion_sdk::{Interest, Role, User};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::entity::enums::DbRole;
use super::entity::{interest, user, user_interest};
use super::mapper::user_with_interests;
use crate::domain::repo::{NewUserRecord, StoredCredentials, UserRepository};

/// `SeaORM` implementation of `UserRepository`.
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Attach interests (sorted by name) to a batch of user rows.
pub(super) async fn hydrate_users<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<user::Model>,
) -> anyhow::Result<Vec<User>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let links = user_interest::Entity::find()
        .filter(user_interest::Column::UserId.is_in(ids))
        .find_also_related(interest::Entity)
        .all(conn)
        .await
        .context("load user interests failed")?;

    let mut by_user: HashMap<Uuid, Vec<Interest>> = HashMap::new();
    for (link, found) in links {
        if let Some(i) = found {
            by_user.entry(link.user_id).or_default().push(i.into());
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut interests = by_user.remove(&row.id).unwrap_or_default();
            interests.sort_by(|a, b| a.name.cmp(&b.name));
            user_with_interests(row, interests)
        })
        .collect())
}

/// Load users by id, keyed by id. Missing ids are absent from the map.
pub(super) async fn load_users<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> anyhow::Result<HashMap<Uuid, User>> {
    let ids: HashSet<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(conn)
        .await
        .context("load users failed")?;
    Ok(hydrate_users(conn, rows)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    interest_ids: impl IntoIterator<Item = Uuid>,
) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    let links: Vec<user_interest::ActiveModel> = interest_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .map(|interest_id| user_interest::ActiveModel {
            user_id: Set(user_id),
            interest_id: Set(interest_id),
        })
        .collect();
    if links.is_empty() {
        return Ok(());
    }
    user_interest::Entity::insert_many(links)
        .exec(conn)
        .await
        .context("insert user interests failed")?;
    Ok(())
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    #[instrument(
        name = "companion.repo.users.find_by_id",
        skip(self),
        fields(db.operation = "SELECT", user.id = %id)
    )]
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        debug!("Finding user by id");
        let Some(row) = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find_by_id query failed")?
        else {
            return Ok(None);
        };
        Ok(hydrate_users(&self.db, vec![row]).await?.pop())
    }

    #[instrument(
        name = "companion.repo.users.find_credentials_by_email",
        skip(self),
        fields(db.operation = "SELECT")
    )]
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<StoredCredentials>> {
        let Some(row) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find_by_email query failed")?
        else {
            return Ok(None);
        };
        let password_hash = row.password_hash.clone();
        let user = hydrate_users(&self.db, vec![row])
            .await?
            .pop()
            .context("hydrated user missing")?;
        Ok(Some(StoredCredentials {
            user,
            password_hash,
        }))
    }

    #[instrument(
        name = "companion.repo.users.exists_by_email",
        skip(self),
        fields(db.operation = "SELECT COUNT")
    )]
    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("exists_by_email query failed")?;
        Ok(count > 0)
    }

    #[instrument(
        name = "companion.repo.users.create",
        skip(self, record),
        fields(db.operation = "INSERT", user.role = %record.role)
    )]
    async fn create(&self, record: NewUserRecord) -> anyhow::Result<User> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        debug!(user.id = %id, "Inserting user");

        let txn = self.db.begin().await.context("begin transaction failed")?;
        let row = user::ActiveModel {
            id: Set(id),
            name: Set(record.name),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            age: Set(record.age),
            bio: Set(record.bio),
            phone: Set(None),
            photo_url: Set(None),
            role: Set(DbRole::from(record.role)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .context("insert user failed")?;
        insert_links(&txn, id, record.interest_ids).await?;
        txn.commit().await.context("commit failed")?;

        hydrate_users(&self.db, vec![row])
            .await?
            .pop()
            .context("hydrated user missing")
    }

    #[instrument(
        name = "companion.repo.users.update",
        skip(self, u),
        fields(db.operation = "UPDATE", user.id = %u.id)
    )]
    async fn update(&self, u: &User) -> anyhow::Result<()> {
        user::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(u.id),
            name: Set(u.name.clone()),
            age: Set(u.age),
            bio: Set(u.bio.clone()),
            phone: Set(u.phone.clone()),
            photo_url: Set(u.photo_url.clone()),
            is_active: Set(u.is_active),
            updated_at: Set(OffsetDateTime::now_utc()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user failed")?;
        Ok(())
    }

    #[instrument(
        name = "companion.repo.users.find_by_role",
        skip(self),
        fields(db.operation = "SELECT", user.role = %role)
    )]
    async fn find_by_role(&self, role: Role) -> anyhow::Result<Vec<User>> {
        let rows = user::Entity::find()
            .filter(user::Column::Role.eq(DbRole::from(role)))
            .filter(user::Column::IsActive.eq(true))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .context("find_by_role query failed")?;
        debug!(count = rows.len(), "Loaded users by role");
        hydrate_users(&self.db, rows).await
    }

    #[instrument(
        name = "companion.repo.users.replace_interests",
        skip(self, interest_ids),
        fields(db.operation = "DELETE+INSERT", user.id = %user_id)
    )]
    async fn replace_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> anyhow::Result<()> {
        let txn = self.db.begin().await.context("begin transaction failed")?;
        user_interest::Entity::delete_many()
            .filter(user_interest::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .context("clear user interests failed")?;
        insert_links(&txn, user_id, interest_ids.iter().copied()).await?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    #[instrument(
        name = "companion.repo.users.append_interests",
        skip(self, interest_ids),
        fields(db.operation = "INSERT", user.id = %user_id)
    )]
    async fn append_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> anyhow::Result<()> {
        let txn = self.db.begin().await.context("begin transaction failed")?;
        let existing: HashSet<Uuid> = user_interest::Entity::find()
            .filter(user_interest::Column::UserId.eq(user_id))
            .all(&txn)
            .await
            .context("load user interests failed")?
            .into_iter()
            .map(|l| l.interest_id)
            .collect();
        insert_links(
            &txn,
            user_id,
            interest_ids
                .iter()
                .copied()
                .filter(|id| !existing.contains(id)),
        )
        .await?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    #[instrument(
        name = "companion.repo.users.remove_interest",
        skip(self),
        fields(db.operation = "DELETE", user.id = %user_id)
    )]
    async fn remove_interest(&self, user_id: Uuid, interest_id: Uuid) -> anyhow::Result<()> {
        user_interest::Entity::delete_many()
            .filter(user_interest::Column::UserId.eq(user_id))
            .filter(user_interest::Column::InterestId.eq(interest_id))
            .exec(&self.db)
            .await
            .context("remove user interest failed")?;
        Ok(())
    }
}
