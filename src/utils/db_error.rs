//! Classification of PostgreSQL unique violations on the `shortener` table.

/// Unique constraint on the short key column.
pub const KEY_CONSTRAINT: &str = "shortener_pkey";

/// Unique constraint on the original URL column.
pub const URL_CONSTRAINT: &str = "shortener_original_url_key";

/// Column whose uniqueness a failed insert violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueViolation {
    Key,
    OriginalUrl,
}

/// Maps a sqlx error to the violated unique column, if any.
///
/// Violations of unknown constraints are treated as URL conflicts, the only
/// other unique index on the table.
pub fn unique_violation(e: &sqlx::Error) -> Option<UniqueViolation> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    match db_err.constraint() {
        Some(KEY_CONSTRAINT) => Some(UniqueViolation::Key),
        _ => Some(UniqueViolation::OriginalUrl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_not_a_violation() {
        assert_eq!(unique_violation(&sqlx::Error::RowNotFound), None);
        assert_eq!(unique_violation(&sqlx::Error::PoolTimedOut), None);
    }
}
