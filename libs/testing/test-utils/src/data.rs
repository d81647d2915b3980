use chrono::NaiveDate;
use std::hash::{BuildHasher, BuildHasherDefault, DefaultHasher};
use uuid::Uuid;

/// Household data keyed by a seed.
///
/// Equal seeds give equal values. Distinct test names give distinct emails,
/// so suites sharing one database stay clear of the active-email index.
#[derive(Clone, Copy, Debug)]
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let data = TestDataBuilder::from_test_name("test_create_child");
    /// assert_eq!(data.email("kid"), TestDataBuilder::from_test_name("test_create_child").email("kid"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        Self::new(BuildHasherDefault::<DefaultHasher>::default().hash_one(name))
    }

    /// An id no stored user will ever have; users get v7 ids.
    pub fn unknown_id(&self) -> Uuid {
        Uuid::from_u64_pair(self.seed, !self.seed)
    }

    /// e.g. `"Test parent 1234"`
    pub fn name(&self, label: &str) -> String {
        format!("Test {} {}", label, self.seed % 100_000)
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// assert_eq!(TestDataBuilder::new(7).email("kid"), "kid.7@test.example.com");
    /// ```
    pub fn email(&self, label: &str) -> String {
        format!("{}.{}@test.example.com", label, self.seed)
    }

    pub fn parent_birth_date(&self) -> NaiveDate {
        self.date(1980, 6, 15)
    }

    pub fn child_birth_date(&self) -> NaiveDate {
        self.date(2012, 3, 10)
    }

    fn date(&self, base_year: i32, month: u32, day: u32) -> NaiveDate {
        let year = base_year + (self.seed % 8) as i32;
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_household() {
        let a = TestDataBuilder::new(42);
        let b = TestDataBuilder::new(42);

        assert_eq!(a.unknown_id(), b.unknown_id());
        assert_eq!(a.email("parent"), b.email("parent"));
        assert_eq!(a.name("child"), b.name("child"));
    }

    #[test]
    fn test_test_names_do_not_collide() {
        let a = TestDataBuilder::from_test_name("create_child");
        let b = TestDataBuilder::from_test_name("delete_child");

        assert_ne!(a.unknown_id(), b.unknown_id());
        assert_ne!(a.email("parent"), b.email("parent"));
    }

    #[test]
    fn test_parents_are_born_before_children() {
        let data = TestDataBuilder::from_test_name("dates");
        let today = chrono::Utc::now().date_naive();

        assert!(data.parent_birth_date() < data.child_birth_date());
        assert!(data.child_birth_date() < today);
    }
}
