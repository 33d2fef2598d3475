//! `SeaORM` entities for the companion tables.

pub use appointment::Entity as AppointmentEntity;
pub use connection::Entity as ConnectionEntity;
pub use interest::Entity as InterestEntity;
pub use user::Entity as UserEntity;
pub use user_interest::Entity as UserInterestEntity;

/// String-backed enum columns.
pub mod enums {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
    pub enum DbRole {
        #[sea_orm(string_value = "VOLUNTEER")]
        Volunteer,
        #[sea_orm(string_value = "ELDERLY")]
        Elderly,
        #[sea_orm(string_value = "INSTITUTION")]
        Institution,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
    pub enum DbConnectionStatus {
        #[sea_orm(string_value = "PENDING")]
        Pending,
        #[sea_orm(string_value = "ACCEPTED")]
        Accepted,
        #[sea_orm(string_value = "REJECTED")]
        Rejected,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
    pub enum DbAppointmentStatus {
        #[sea_orm(string_value = "PENDING")]
        Pending,
        #[sea_orm(string_value = "CONFIRMED")]
        Confirmed,
        #[sea_orm(string_value = "CANCELLED")]
        Cancelled,
        #[sea_orm(string_value = "COMPLETED")]
        Completed,
    }
}

/// User entity module.
pub mod user {
    use sea_orm::entity::prelude::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::enums::DbRole;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        #[sea_orm(unique)]
        pub email: String,
        pub password_hash: String,
        pub age: Option<i32>,
        pub bio: Option<String>,
        pub phone: Option<String>,
        pub photo_url: Option<String>,
        pub role: DbRole,
        pub is_active: bool,
        pub created_at: OffsetDateTime,
        pub updated_at: OffsetDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::user_interest::Entity")]
        UserInterests,
    }

    impl Related<super::user_interest::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::UserInterests.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Interest catalogue entity module.
pub mod interest {
    use sea_orm::entity::prelude::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "interests")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub name: String,
        pub icon: String,
        pub created_at: OffsetDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::user_interest::Entity")]
        UserInterests,
    }

    impl Related<super::user_interest::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::UserInterests.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Join table between users and interests.
pub mod user_interest {
    use sea_orm::entity::prelude::*;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "user_interests")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub user_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub interest_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::UserId",
            to = "super::user::Column::Id"
        )]
        User,
        #[sea_orm(
            belongs_to = "super::interest::Entity",
            from = "Column::InterestId",
            to = "super::interest::Column::Id"
        )]
        Interest,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl Related<super::interest::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Interest.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Connection entity module.
pub mod connection {
    use sea_orm::entity::prelude::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::enums::{DbConnectionStatus, DbRole};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "connections")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub volunteer_id: Uuid,
        pub target_id: Uuid,
        pub target_role: DbRole,
        pub status: DbConnectionStatus,
        pub matched_interests: i32,
        pub version: i32,
        pub created_at: OffsetDateTime,
        pub updated_at: OffsetDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Appointment entity module.
pub mod appointment {
    use sea_orm::entity::prelude::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::enums::{DbAppointmentStatus, DbRole};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "appointments")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub volunteer_id: Uuid,
        pub target_id: Uuid,
        pub target_role: DbRole,
        pub date: OffsetDateTime,
        pub duration_minutes: i32,
        pub status: DbAppointmentStatus,
        pub meeting_url: Option<String>,
        pub notes: Option<String>,
        pub rating: Option<i32>,
        pub version: i32,
        pub created_at: OffsetDateTime,
        pub updated_at: OffsetDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
