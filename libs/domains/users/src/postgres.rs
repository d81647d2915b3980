use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::entity::{self, user, user_profile};
use crate::error::{UserError, UserResult};
use crate::models::{NewUser, UpsertProfile, User, UserProfile};
use crate::repository::UserRepository;

/// SeaORM-backed repository.
///
/// Email uniqueness among active users is enforced by the partial index
/// `ux_users_email_active`; a violation surfaces as `DuplicateEmail`.
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attaches the parent (any status) and active children to a row.
    async fn hydrate(
        &self,
        model: user::Model,
        profile: Option<user_profile::Model>,
    ) -> UserResult<User> {
        let parent = match model.parent_id {
            Some(parent_id) => user::Entity::find_by_id(parent_id)
                .find_also_related(user_profile::Entity)
                .one(&self.db)
                .await?
                .map(|(row, profile)| Box::new(entity::to_user(row, profile))),
            None => None,
        };
        let children = self.children_of(model.id).await?;

        let mut user = entity::to_user(model, profile);
        user.parent = parent;
        user.children = children;
        Ok(user)
    }

    async fn children_of(&self, parent_id: Uuid) -> UserResult<Vec<User>> {
        let rows = user::Entity::find()
            .filter(user::Column::ParentId.eq(parent_id))
            .filter(user::Column::IsActive.eq(true))
            .order_by_asc(user::Column::Name)
            .find_also_related(user_profile::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(row, profile)| entity::to_user(row, profile))
            .collect())
    }

    async fn find_active(&self, id: Uuid) -> UserResult<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .filter(user::Column::IsActive.eq(true))
            .find_also_related(user_profile::Entity)
            .one(&self.db)
            .await?;

        match found {
            Some((row, profile)) => Ok(Some(self.hydrate(row, profile).await?)),
            None => Ok(None),
        }
    }
}

/// Maps constraint violations raised by a write to domain errors.
fn write_error(err: DbErr, email: &str) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => UserError::InvalidParent,
        _ => UserError::Database(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        self.find_active(id).await
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::IsActive.eq(true))
            .find_also_related(user_profile::Entity)
            .one(&self.db)
            .await?;

        match found {
            Some((row, profile)) => Ok(Some(self.hydrate(row, profile).await?)),
            None => Ok(None),
        }
    }

    async fn get_children(&self, parent_id: Uuid) -> UserResult<Vec<User>> {
        self.children_of(parent_id).await
    }

    async fn create(&self, input: NewUser) -> UserResult<User> {
        let created_at = input.created_at.fixed_offset();
        let active_model = user::ActiveModel {
            id: Set(input.id),
            name: Set(input.name),
            email: Set(input.email.clone()),
            role: Set(input.role),
            birth_date: Set(input.birth_date),
            parent_id: Set(input.parent_id),
            is_active: Set(true),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &input.email))?;

        tracing::info!(user_id = %model.id, role = %model.role, "Created user");

        self.find_active(model.id)
            .await?
            .ok_or_else(|| UserError::Internal(format!("User {} missing after insert", model.id)))
    }

    async fn update(&self, input: User) -> UserResult<User> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::Name, Expr::value(input.name.clone()))
            .col_expr(user::Column::Email, Expr::value(input.email.clone()))
            .col_expr(user::Column::BirthDate, Expr::value(input.birth_date))
            .col_expr(
                user::Column::UpdatedAt,
                Expr::value(input.updated_at.fixed_offset()),
            )
            .filter(user::Column::Id.eq(input.id))
            .filter(user::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| write_error(e, &input.email))?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(input.id));
        }

        tracing::info!(user_id = %input.id, "Updated user");

        self.find_active(input.id)
            .await?
            .ok_or(UserError::NotFound(input.id))
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::IsActive, Expr::value(false))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::IsActive.eq(true))
            .exec(&self.db)
            .await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(user_id = %id, "Deactivated user");
        }
        Ok(deleted)
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> UserResult<bool> {
        let mut query = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::IsActive.eq(true));

        if let Some(id) = exclude_id {
            query = query.filter(user::Column::Id.ne(id));
        }

        Ok(query.count(&self.db).await? > 0)
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        profile: UpsertProfile,
    ) -> UserResult<UserProfile> {
        let exists = user::Entity::find_by_id(user_id)
            .filter(user::Column::IsActive.eq(true))
            .count(&self.db)
            .await?
            > 0;
        if !exists {
            return Err(UserError::NotFound(user_id));
        }

        let now = Utc::now().fixed_offset();
        let active_model = user_profile::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            avatar_url: Set(profile.avatar_url),
            theme: Set(profile.theme),
            language: Set(profile.language),
            time_zone: Set(profile.time_zone),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = user_profile::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(user_profile::Column::UserId)
                    .update_columns([
                        user_profile::Column::AvatarUrl,
                        user_profile::Column::Theme,
                        user_profile::Column::Language,
                        user_profile::Column::TimeZone,
                        user_profile::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        tracing::debug!(user_id = %user_id, "Saved user profile");
        Ok(saved.into())
    }
}
