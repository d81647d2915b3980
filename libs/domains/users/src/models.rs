use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Household role. Parsing is case-sensitive: only `"Child"` and `"Parent"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum Role {
    #[sea_orm(string_value = "Child")]
    Child,
    #[sea_orm(string_value = "Parent")]
    Parent,
}

/// User aggregate with its eagerly loaded associations.
///
/// `parent` and each entry of `children` are loaded one level deep: they
/// carry their own profile but no further parent or children.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub birth_date: NaiveDate,
    pub parent_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: Option<UserProfile>,
    pub parent: Option<Box<User>>,
    pub children: Vec<User>,
}

impl User {
    /// Copy of this user without nested parent/children.
    pub fn shallow(&self) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Applies the mutable fields of an update and bumps `updated_at`.
    pub fn apply_update(&mut self, input: UpdateUserRequest) {
        self.name = input.name;
        self.email = input.email;
        self.birth_date = input.birth_date;
        self.updated_at = Utc::now();
    }
}

/// Per-user display preferences (zero or one per user).
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub avatar_url: Option<String>,
    pub theme: String,
    pub language: String,
    pub time_zone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository input for inserting a user. The row starts active.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub birth_date: NaiveDate,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        name: String,
        email: String,
        role: Role,
        birth_date: NaiveDate,
        parent_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            role,
            birth_date,
            parent_id,
            created_at: Utc::now(),
        }
    }
}

/// Repository input for creating or replacing a user's profile.
///
/// Lengths match the `user_profiles` varchar columns.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct UpsertProfile {
    #[validate(length(max = 500, message = "Avatar URL must be at most 500 characters"))]
    pub avatar_url: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Theme must be 1-20 characters"))]
    pub theme: String,
    #[validate(length(min = 1, max = 10, message = "Language must be 1-10 characters"))]
    pub language: String,
    #[validate(length(min = 1, max = 50, message = "Time zone must be 1-50 characters"))]
    pub time_zone: String,
}

impl Default for UpsertProfile {
    fn default() -> Self {
        Self {
            avatar_url: None,
            theme: "default".to_string(),
            language: "ja-JP".to_string(),
            time_zone: "Asia/Tokyo".to_string(),
        }
    }
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    #[schema(example = "Taro Tanaka")]
    pub name: String,
    #[schema(example = "taro.tanaka@example.com")]
    pub email: String,
    pub role: Role,
    #[schema(value_type = String, format = Date, example = "2015-04-01")]
    pub birth_date: NaiveDate,
    pub parent_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: Option<UserProfileDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub avatar_url: Option<String>,
    #[schema(example = "default")]
    pub theme: String,
    #[schema(example = "ja-JP")]
    pub language: String,
    #[schema(example = "Asia/Tokyo")]
    pub time_zone: String,
}

impl From<UserProfile> for UserProfileDto {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            avatar_url: profile.avatar_url,
            theme: profile.theme,
            language: profile.language,
            time_zone: profile.time_zone,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            birth_date: user.birth_date,
            parent_id: user.parent_id,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
            profile: user.profile.map(Into::into),
        }
    }
}

fn rule_violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_violation("not_blank", "Name is required"));
    }
    Ok(())
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>()
        .map(|_| ())
        .map_err(|_| rule_violation("role", "Role must be 'Child' or 'Parent'"))
}

fn validate_birth_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= Utc::now().date_naive() {
        return Err(rule_violation("birth_date", "Birth date must be before today"));
    }
    Ok(())
}

/// Body of `POST /api/v1/users`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Taro Tanaka")]
    pub name: String,
    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "taro.tanaka@example.com")]
    pub email: String,
    /// `"Child"` or `"Parent"`
    #[validate(custom(function = "validate_role"))]
    #[schema(example = "Child")]
    pub role: String,
    #[validate(custom(function = "validate_birth_date"))]
    #[schema(value_type = String, format = Date, example = "2015-04-01")]
    pub birth_date: NaiveDate,
    /// Required for children, forbidden for parents
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Body of `PUT /api/v1/users/{userId}`. Role and parent are immutable.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(custom(function = "validate_birth_date"))]
    #[schema(value_type = String, format = Date, example = "2015-04-01")]
    pub birth_date: NaiveDate,
}
