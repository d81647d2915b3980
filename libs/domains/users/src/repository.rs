use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, UpsertProfile, User, UserProfile};

/// Persistence for the user aggregate.
///
/// Every read sees active users only. Aggregates come back with their
/// profile, parent (active or not) and active children ordered by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Active children of `parent_id`, each with its profile
    async fn get_children(&self, parent_id: Uuid) -> UserResult<Vec<User>>;

    /// Insert and re-read. A taken active email fails with `DuplicateEmail`,
    /// a dangling parent with `InvalidParent`.
    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// Persist name, email, birth date and `updated_at`, then re-read
    async fn update(&self, user: User) -> UserResult<User>;

    /// Logical delete. `false` when no active user has that id.
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> UserResult<bool>;

    /// Create or replace the profile of an active user
    async fn upsert_profile(&self, user_id: Uuid, profile: UpsertProfile)
    -> UserResult<UserProfile>;
}

#[derive(Debug, Default)]
struct Store {
    /// Bare rows: no profile, parent or children attached
    users: HashMap<Uuid, User>,
    /// Keyed by user id
    profiles: HashMap<Uuid, UserProfile>,
}

impl Store {
    fn active(&self, id: Uuid) -> Option<&User> {
        self.users.get(&id).filter(|u| u.is_active)
    }

    fn email_taken(&self, email: &str, exclude_id: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.is_active && u.email == email && Some(u.id) != exclude_id)
    }

    fn with_profile(&self, row: &User) -> User {
        User {
            profile: self.profiles.get(&row.id).cloned(),
            ..row.clone()
        }
    }

    fn children_of(&self, parent_id: Uuid) -> Vec<User> {
        let mut children: Vec<User> = self
            .users
            .values()
            .filter(|u| u.is_active && u.parent_id == Some(parent_id))
            .map(|u| self.with_profile(u))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    fn aggregate(&self, row: &User) -> User {
        let mut user = self.with_profile(row);
        user.parent = row
            .parent_id
            .and_then(|pid| self.users.get(&pid))
            .map(|p| Box::new(self.with_profile(p)));
        user.children = self.children_of(row.id);
        user
    }
}

/// Process-local store for development and tests.
///
/// Enforces the same constraints as the Postgres schema: email unique among
/// active users and `parent_id` referencing an existing row.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.active(id).map(|row| store.aggregate(row)))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        let row = store
            .users
            .values()
            .find(|u| u.is_active && u.email == email);
        Ok(row.map(|row| store.aggregate(row)))
    }

    async fn get_children(&self, parent_id: Uuid) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.children_of(parent_id))
    }

    async fn create(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&user.email, None) {
            return Err(UserError::DuplicateEmail(user.email));
        }
        if user
            .parent_id
            .is_some_and(|parent_id| !store.users.contains_key(&parent_id))
        {
            return Err(UserError::InvalidParent);
        }

        let row = User {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            birth_date: user.birth_date,
            parent_id: user.parent_id,
            is_active: true,
            created_at: user.created_at,
            updated_at: user.created_at,
            profile: None,
            parent: None,
            children: Vec::new(),
        };
        store.users.insert(row.id, row.clone());

        tracing::info!(user_id = %row.id, role = %row.role, "Created user");
        Ok(store.aggregate(&row))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.active(user.id).is_none() {
            return Err(UserError::NotFound(user.id));
        }
        if store.email_taken(&user.email, Some(user.id)) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let row = store
            .users
            .get_mut(&user.id)
            .ok_or(UserError::NotFound(user.id))?;
        row.name = user.name;
        row.email = user.email;
        row.birth_date = user.birth_date;
        row.updated_at = user.updated_at;
        let row = row.clone();

        tracing::info!(user_id = %row.id, "Updated user");
        Ok(store.aggregate(&row))
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut store = self.store.write().await;
        match store.users.get_mut(&id) {
            Some(row) if row.is_active => {
                row.is_active = false;
                row.updated_at = Utc::now();
                tracing::info!(user_id = %id, "Deactivated user");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store.email_taken(email, exclude_id))
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        profile: UpsertProfile,
    ) -> UserResult<UserProfile> {
        let mut store = self.store.write().await;
        if store.active(user_id).is_none() {
            return Err(UserError::NotFound(user_id));
        }

        let now = Utc::now();
        let saved = store
            .profiles
            .entry(user_id)
            .and_modify(|existing| {
                existing.avatar_url = profile.avatar_url.clone();
                existing.theme = profile.theme.clone();
                existing.language = profile.language.clone();
                existing.time_zone = profile.time_zone.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| UserProfile {
                id: Uuid::now_v7(),
                user_id,
                avatar_url: profile.avatar_url.clone(),
                theme: profile.theme.clone(),
                language: profile.language.clone(),
                time_zone: profile.time_zone.clone(),
                created_at: now,
                updated_at: now,
            })
            .clone();

        Ok(saved)
    }
}
