//! Development demo household.
//!
//! Records go through `UserService`, so the usual parent/child rules apply.

use chrono::NaiveDate;
use domain_users::{
    CreateUserRequest, Role, UpsertProfile, UserError, UserRepository, UserResult, UserService,
};
use tracing::info;

pub const DEMO_PARENT_EMAIL: &str = "hanako.tanaka@example.com";
pub const DEMO_CHILD_EMAIL: &str = "taro.tanaka@example.com";

fn date(year: i32, month: u32, day: u32) -> UserResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| UserError::Internal(format!("Invalid seed date {year}-{month}-{day}")))
}

/// Creates Hanako (parent, with a default profile) and Taro (her child)
/// unless Hanako already exists.
pub async fn seed_demo_data<R: UserRepository>(service: &UserService<R>) -> UserResult<()> {
    if service.find_by_email(DEMO_PARENT_EMAIL).await?.is_some() {
        info!("Demo data already present, skipping seed");
        return Ok(());
    }

    let parent = service
        .create_user(CreateUserRequest {
            name: "Hanako Tanaka".to_string(),
            email: DEMO_PARENT_EMAIL.to_string(),
            role: Role::Parent.to_string(),
            birth_date: date(1985, 5, 15)?,
            parent_id: None,
        })
        .await?;

    service
        .upsert_profile(parent.id, UpsertProfile::default())
        .await?;

    let child = service
        .create_user(CreateUserRequest {
            name: "Taro Tanaka".to_string(),
            email: DEMO_CHILD_EMAIL.to_string(),
            role: Role::Child.to_string(),
            birth_date: date(2015, 4, 1)?,
            parent_id: Some(parent.id),
        })
        .await?;

    info!(parent_id = %parent.id, child_id = %child.id, "Seeded demo household");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_users::InMemoryUserRepository;

    #[tokio::test]
    async fn test_seed_creates_household_once() {
        let service = UserService::new(InMemoryUserRepository::new());

        seed_demo_data(&service).await.unwrap();
        seed_demo_data(&service).await.unwrap();

        let parent = service
            .find_by_email(DEMO_PARENT_EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(parent.role, Role::Parent);

        let profile = parent.profile.unwrap();
        assert_eq!(profile.theme, "default");
        assert_eq!(profile.language, "ja-JP");
        assert_eq!(profile.time_zone, "Asia/Tokyo");

        let children = service.get_children(parent.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].email, DEMO_CHILD_EMAIL);
        assert_eq!(children[0].birth_date, date(2015, 4, 1).unwrap());
    }
}
