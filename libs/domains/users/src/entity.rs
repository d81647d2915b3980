//! Sea-ORM entities for the `users` and `user_profiles` tables.

use crate::models::{User, UserProfile};

pub mod user {
    use crate::models::Role;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub role: Role,
        pub birth_date: Date,
        pub parent_id: Option<Uuid>,
        pub is_active: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_one = "super::user_profile::Entity")]
        Profile,
    }

    impl Related<super::user_profile::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Profile.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod user_profile {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "user_profiles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub user_id: Uuid,
        pub avatar_url: Option<String>,
        pub theme: String,
        pub language: String,
        pub time_zone: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::UserId",
            to = "super::user::Column::Id",
            on_delete = "Cascade"
        )]
        User,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<user_profile::Model> for UserProfile {
    fn from(model: user_profile::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            avatar_url: model.avatar_url,
            theme: model.theme,
            language: model.language,
            time_zone: model.time_zone,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Builds a user from a row and its optional profile row, without relatives.
pub fn to_user(model: user::Model, profile: Option<user_profile::Model>) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        role: model.role,
        birth_date: model.birth_date,
        parent_id: model.parent_id,
        is_active: model.is_active,
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
        profile: profile.map(Into::into),
        parent: None,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::{NaiveDate, Utc};
    use sea_orm::prelude::Uuid;

    #[test]
    fn test_row_pair_maps_to_user() {
        let now = Utc::now().fixed_offset();
        let id = Uuid::now_v7();
        let parent_id = Uuid::now_v7();

        let row = user::Model {
            id,
            name: "Taro Tanaka".into(),
            email: "taro@example.com".into(),
            role: Role::Child,
            birth_date: NaiveDate::from_ymd_opt(2015, 4, 1).unwrap(),
            parent_id: Some(parent_id),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let profile = user_profile::Model {
            id: Uuid::now_v7(),
            user_id: id,
            avatar_url: None,
            theme: "default".into(),
            language: "ja-JP".into(),
            time_zone: "Asia/Tokyo".into(),
            created_at: now,
            updated_at: now,
        };

        let user = to_user(row, Some(profile));
        assert_eq!(user.id, id);
        assert_eq!(user.parent_id, Some(parent_id));
        assert_eq!(user.created_at, now.with_timezone(&Utc));
        assert_eq!(user.profile.unwrap().time_zone, "Asia/Tokyo");
        assert!(user.parent.is_none());
        assert!(user.children.is_empty());
    }
}
