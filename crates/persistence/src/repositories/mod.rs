//! Repository implementations of the domain store traits.

pub mod community;
pub mod membership_link;

pub use community::CommunityRepository;
pub use membership_link::MembershipLinkRepository;

use domain::store::StoreError;

/// Maps a database error onto the domain-level store error.
///
/// A foreign key violation means a referenced row (a user, a community)
/// does not exist, which is caller input, not a backend fault.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::NotFound,
        _ => StoreError::Backend(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct StubDbError(&'static str);

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            self.0
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                "unique" => ErrorKind::UniqueViolation,
                "foreign_key" => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(tag: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError(tag)))
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        assert!(matches!(
            map_sqlx_error(db_error("unique")),
            StoreError::Conflict
        ));
    }

    #[test]
    fn test_foreign_key_violation_maps_to_not_found() {
        // Linking a user that has no users row must not surface as a 500.
        assert!(matches!(
            map_sqlx_error(db_error("foreign_key")),
            StoreError::NotFound
        ));
    }

    #[test]
    fn test_other_database_errors_are_backend() {
        assert!(matches!(
            map_sqlx_error(db_error("deadlock")),
            StoreError::Backend(_)
        ));
    }
}
