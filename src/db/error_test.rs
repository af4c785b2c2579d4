//! Tests for database error types.

use crate::db::{DbError, DbResult};

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::NotFound {
        entity_type: "BlogPost".to_string(),
        id: "abc12345".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Entity not found: BlogPost with id 'abc12345'"
    );
}

#[test]
fn not_found_helper_matches_struct_form() {
    let err = DbError::not_found("Lead", "0badf00d");
    match err {
        DbError::NotFound { entity_type, id } => {
            assert_eq!(entity_type, "Lead");
            assert_eq!(id, "0badf00d");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn already_exists_error_displays_correctly() {
    let err = DbError::AlreadyExists {
        entity_type: "Image".to_string(),
        id: "logo.png".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Entity already exists: Image with id 'logo.png'"
    );
}

#[test]
fn migration_error_displays_correctly() {
    let err = DbError::Migration {
        message: "failed to apply migration 20251001000000".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Migration error: failed to apply migration 20251001000000"
    );
}

#[test]
fn sqlx_errors_convert_to_database_errors() {
    let err: DbError = sqlx::Error::PoolTimedOut.into();
    assert!(matches!(err, DbError::Database { .. }));
}

#[test]
fn db_result_propagates_with_question_mark() {
    fn inner() -> DbResult<()> {
        Err(DbError::Validation {
            message: "title is required".to_string(),
        })
    }
    fn outer() -> DbResult<u8> {
        inner()?;
        Ok(1)
    }
    assert!(outer().is_err());
}
