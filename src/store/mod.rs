//! SQLite persistence.
//!
//! Every function takes the pool explicitly and returns domain structs; the
//! `Db*` row types never leave this module tree. Scope predicates computed by
//! [`crate::authz`] are bound straight into the SQL, using the
//! `(? IS NULL OR col = ?)` idiom for optional filters.

pub mod achievements;
pub mod catalog;
pub mod users;

use crate::errors::AppError;

/// Maps a UNIQUE constraint hit to a conflict, anything else to a database error.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::conflict(message),
        _ => AppError::Database(err),
    }
}

/// `%term%` for case-insensitive `LIKE ... ESCAPE '\'` search, `None` for
/// blank input. `%`, `_` and `\` in the term match literally.
pub(crate) fn like_pattern(term: Option<&str>) -> Option<String> {
    term.map(str::trim).filter(|t| !t.is_empty()).map(|t| {
        let mut escaped = String::with_capacity(t.len() + 2);
        for c in t.to_lowercase().chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        format!("%{escaped}%")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_skips_blank_terms() {
        assert_eq!(like_pattern(Some("  Hack ")), Some("%hack%".to_string()));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(Some("_")), Some(r"%\_%".to_string()));
        assert_eq!(like_pattern(Some("100%")), Some(r"%100\%%".to_string()));
        assert_eq!(like_pattern(Some(r"a\b")), Some(r"%a\\b%".to_string()));
    }
}
