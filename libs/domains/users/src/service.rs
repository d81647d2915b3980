use std::sync::Arc;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUserRequest, NewUser, Role, UpdateUserRequest, UpsertProfile, UserDto, UserProfileDto,
};
use crate::repository::UserRepository;

/// Business rules for users: email uniqueness and the parent/child link.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a user after checking email and parent rules.
    ///
    /// The repository's unique index stays authoritative: a concurrent
    /// insert that wins the race still surfaces as `DuplicateEmail`.
    pub async fn create_user(&self, input: CreateUserRequest) -> UserResult<UserDto> {
        let role: Role = input
            .role
            .parse()
            .map_err(|_| UserError::Validation("Role must be 'Child' or 'Parent'".to_string()))?;

        if self.repository.email_exists(&input.email, None).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        match (role, input.parent_id) {
            (Role::Child, Some(parent_id)) => self.ensure_valid_parent(parent_id).await?,
            (Role::Child, None) => return Err(UserError::ParentIdRequired),
            (Role::Parent, Some(_)) => return Err(UserError::ParentIdNotAllowed),
            (Role::Parent, None) => {}
        }

        let new_user = NewUser::new(
            input.name,
            input.email,
            role,
            input.birth_date,
            input.parent_id,
        );
        let created = self.repository.create(new_user).await?;

        tracing::info!(user_id = %created.id, role = %created.role, "User created");
        Ok(created.into())
    }

    /// The parent must be an active user with the `Parent` role.
    async fn ensure_valid_parent(&self, parent_id: Uuid) -> UserResult<()> {
        match self.repository.get_by_id(parent_id).await? {
            Some(parent) if parent.role == Role::Parent => Ok(()),
            _ => Err(UserError::InvalidParent),
        }
    }

    /// Change name, email and birth date. Role and parent never change.
    pub async fn update_user(&self, id: Uuid, input: UpdateUserRequest) -> UserResult<UserDto> {
        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if self.repository.email_exists(&input.email, Some(id)).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        user.apply_update(input);
        let updated = self.repository.update(user.shallow()).await?;

        tracing::info!(user_id = %id, "User updated");
        Ok(updated.into())
    }

    /// Active user by id. Absence is not an error here.
    pub async fn get_user(&self, id: Uuid) -> UserResult<Option<UserDto>> {
        Ok(self.repository.get_by_id(id).await?.map(Into::into))
    }

    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<UserDto>> {
        Ok(self.repository.get_by_email(email).await?.map(Into::into))
    }

    /// Active children ordered by name. Unknown parents yield an empty list.
    pub async fn get_children(&self, parent_id: Uuid) -> UserResult<Vec<UserDto>> {
        let children = self.repository.get_children(parent_id).await?;
        Ok(children.into_iter().map(Into::into).collect())
    }

    /// Logical delete; profile and links are kept.
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        profile: UpsertProfile,
    ) -> UserResult<UserProfileDto> {
        profile
            .validate()
            .map_err(|e| UserError::Validation(profile_error_message(&e)))?;

        let saved = self.repository.upsert_profile(user_id, profile).await?;
        Ok(saved.into())
    }
}

/// First failing field's message, in field order.
fn profile_error_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid profile".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserProfile};
    use crate::repository::MockUserRepository;
    use chrono::{NaiveDate, Utc};

    fn stored(role: Role, parent_id: Option<Uuid>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::now_v7(),
            name: "Hanako Tanaka".into(),
            email: "hanako@example.com".into(),
            role,
            birth_date: NaiveDate::from_ymd_opt(1985, 5, 15).unwrap(),
            parent_id,
            is_active: true,
            created_at: now,
            updated_at: now,
            profile: None,
            parent: None,
            children: vec![],
        }
    }

    fn request(role: &str, parent_id: Option<Uuid>) -> CreateUserRequest {
        CreateUserRequest {
            name: "Taro".into(),
            email: "taro@x.com".into(),
            role: role.into(),
            birth_date: NaiveDate::from_ymd_opt(2015, 4, 1).unwrap(),
            parent_id,
        }
    }

    fn echo_created(new_user: NewUser) -> User {
        User {
            id: new_user.id,
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
            birth_date: new_user.birth_date,
            parent_id: new_user.parent_id,
            is_active: true,
            created_at: new_user.created_at,
            updated_at: new_user.created_at,
            profile: None,
            parent: None,
            children: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_child_with_valid_parent() {
        let parent = stored(Role::Parent, None);
        let parent_id = parent.id;

        let mut mock = MockUserRepository::new();
        mock.expect_email_exists()
            .withf(|email, exclude| email.to_string() == "taro@x.com" && exclude.is_none())
            .times(1)
            .returning(|_, _| Ok(false));
        mock.expect_get_by_id()
            .withf(move |id| *id == parent_id)
            .times(1)
            .returning(move |_| Ok(Some(parent.clone())));
        mock.expect_create()
            .times(1)
            .returning(|new_user| Ok(echo_created(new_user)));

        let service = UserService::new(mock);
        let dto = service
            .create_user(request("Child", Some(parent_id)))
            .await
            .unwrap();

        assert_eq!(dto.role, Role::Child);
        assert_eq!(dto.parent_id, Some(parent_id));
        assert!(dto.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_email_checked_first() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_, _| Ok(true));
        mock.expect_get_by_id().never();
        mock.expect_create().never();

        let service = UserService::new(mock);
        let result = service.create_user(request("Parent", Some(Uuid::now_v7()))).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(e)) if e == "taro@x.com"));
    }

    #[tokio::test]
    async fn test_child_of_child_is_invalid_parent() {
        let other_child = stored(Role::Child, Some(Uuid::now_v7()));

        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_, _| Ok(false));
        mock.expect_get_by_id()
            .returning(move |_| Ok(Some(other_child.clone())));
        mock.expect_create().never();

        let service = UserService::new(mock);
        let result = service.create_user(request("Child", Some(Uuid::now_v7()))).await;

        assert!(matches!(result, Err(UserError::InvalidParent)));
    }

    #[tokio::test]
    async fn test_missing_parent_is_invalid_parent() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_, _| Ok(false));
        mock.expect_get_by_id().returning(|_| Ok(None));
        mock.expect_create().never();

        let service = UserService::new(mock);
        let result = service.create_user(request("Child", Some(Uuid::now_v7()))).await;

        assert!(matches!(result, Err(UserError::InvalidParent)));
    }

    #[tokio::test]
    async fn test_parent_with_parent_id_rejected() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_, _| Ok(false));
        mock.expect_get_by_id().never();
        mock.expect_create().never();

        let service = UserService::new(mock);
        let result = service.create_user(request("Parent", Some(Uuid::now_v7()))).await;

        assert!(matches!(result, Err(UserError::ParentIdNotAllowed)));
    }

    #[tokio::test]
    async fn test_child_without_parent_rejected() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_, _| Ok(false));
        mock.expect_create().never();

        let service = UserService::new(mock);
        let result = service.create_user(request("Child", None)).await;

        assert!(matches!(result, Err(UserError::ParentIdRequired)));
    }

    #[tokio::test]
    async fn test_unknown_role_is_validation_error() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().never();

        let service = UserService::new(mock);
        let result = service.create_user(request("child", None)).await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_insert_race_surfaces_as_duplicate_email() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_, _| Ok(false));
        mock.expect_create()
            .returning(|new_user| Err(UserError::DuplicateEmail(new_user.email)));

        let service = UserService::new(mock);
        let result = service.create_user(request("Parent", None)).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_excludes_own_id_from_email_check() {
        let user = stored(Role::Parent, None);
        let id = user.id;

        let mut mock = MockUserRepository::new();
        mock.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        mock.expect_email_exists()
            .withf(move |email, exclude| {
                email.to_string() == "hanako@example.com" && *exclude == Some(id)
            })
            .times(1)
            .returning(|_, _| Ok(false));
        mock.expect_update().times(1).returning(Ok);

        let service = UserService::new(mock);
        let dto = service
            .update_user(
                id,
                UpdateUserRequest {
                    name: "Hanako Suzuki".into(),
                    email: "hanako@example.com".into(),
                    birth_date: NaiveDate::from_ymd_opt(1985, 5, 16).unwrap(),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.name, "Hanako Suzuki");
        assert_eq!(dto.role, Role::Parent);
        assert_eq!(dto.birth_date, NaiveDate::from_ymd_opt(1985, 5, 16).unwrap());
    }

    #[tokio::test]
    async fn test_update_to_taken_email_rejected() {
        let user = stored(Role::Parent, None);

        let mut mock = MockUserRepository::new();
        mock.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        mock.expect_email_exists().returning(|_, _| Ok(true));
        mock.expect_update().never();

        let service = UserService::new(mock);
        let result = service
            .update_user(
                Uuid::now_v7(),
                UpdateUserRequest {
                    name: "Hanako".into(),
                    email: "taken@example.com".into(),
                    birth_date: NaiveDate::from_ymd_opt(1985, 5, 15).unwrap(),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_id().returning(|_| Ok(None));
        mock.expect_email_exists().never();

        let service = UserService::new(mock);
        let id = Uuid::now_v7();
        let result = service
            .update_user(
                id,
                UpdateUserRequest {
                    name: "Hanako".into(),
                    email: "hanako@example.com".into(),
                    birth_date: NaiveDate::from_ymd_opt(1985, 5, 15).unwrap(),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_get_user_absent_is_none() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_id().returning(|_| Ok(None));

        let service = UserService::new(mock);
        assert!(service.get_user(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_user_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let service = UserService::new(mock);
        let result = service.delete_user(Uuid::now_v7()).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_existing_user() {
        let mut mock = MockUserRepository::new();
        mock.expect_delete().times(1).returning(|_| Ok(true));

        let service = UserService::new(mock);
        assert!(service.delete_user(Uuid::now_v7()).await.is_ok());
    }

    #[tokio::test]
    async fn test_upsert_profile_rejects_oversized_theme_before_storage() {
        let mut mock = MockUserRepository::new();
        mock.expect_upsert_profile().never();

        let service = UserService::new(mock);
        let profile = UpsertProfile {
            theme: "t".repeat(21),
            ..UpsertProfile::default()
        };
        let result = service.upsert_profile(Uuid::now_v7(), profile).await;

        assert!(matches!(result, Err(UserError::Validation(ref msg)) if msg == "Theme must be 1-20 characters"));
    }

    #[tokio::test]
    async fn test_upsert_profile_rejects_long_avatar_and_time_zone() {
        let mut mock = MockUserRepository::new();
        mock.expect_upsert_profile().never();

        let service = UserService::new(mock);
        let profile = UpsertProfile {
            avatar_url: Some(format!("https://cdn.example.com/{}", "a".repeat(500))),
            time_zone: "Z".repeat(51),
            ..UpsertProfile::default()
        };
        let result = service.upsert_profile(Uuid::now_v7(), profile).await;

        assert!(matches!(
            result,
            Err(UserError::Validation(ref msg)) if msg == "Avatar URL must be at most 500 characters"
        ));
    }

    #[tokio::test]
    async fn test_upsert_profile_at_column_limits_is_stored() {
        let user_id = Uuid::now_v7();
        let mut mock = MockUserRepository::new();
        mock.expect_upsert_profile()
            .times(1)
            .returning(move |uid, input| {
                Ok(UserProfile {
                    id: Uuid::now_v7(),
                    user_id: uid,
                    avatar_url: input.avatar_url,
                    theme: input.theme,
                    language: input.language,
                    time_zone: input.time_zone,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let service = UserService::new(mock);
        let profile = UpsertProfile {
            avatar_url: Some("a".repeat(500)),
            theme: "t".repeat(20),
            language: "l".repeat(10),
            time_zone: "z".repeat(50),
        };
        let saved = service.upsert_profile(user_id, profile).await.unwrap();

        assert_eq!(saved.user_id, user_id);
        assert_eq!(saved.theme.len(), 20);
    }
}
