//! Classification of database errors by constraint.

/// Unique constraint on `urls.short_key`.
pub const SHORT_KEY_CONSTRAINT: &str = "urls_short_key_key";

/// Unique constraint on `users.username`.
pub const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Foreign key from `urls.user_id` to `users.id`.
pub const OWNER_CONSTRAINT: &str = "urls_user_id_fkey";

/// Returns true if `e` is a unique violation on the named constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}

/// Returns true if `e` is a foreign key violation on the named constraint.
pub fn is_foreign_key_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_foreign_key_violation() && db_err.constraint() == Some(constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_not_violation() {
        assert!(!is_unique_violation_on(
            &sqlx::Error::RowNotFound,
            SHORT_KEY_CONSTRAINT
        ));
        assert!(!is_unique_violation_on(
            &sqlx::Error::PoolTimedOut,
            USERNAME_CONSTRAINT
        ));
        assert!(!is_foreign_key_violation_on(
            &sqlx::Error::RowNotFound,
            OWNER_CONSTRAINT
        ));
    }
}
