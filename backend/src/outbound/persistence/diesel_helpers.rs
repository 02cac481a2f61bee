//! Shared helpers and macros for Diesel repository implementations.
//!
//! - Error mapping from pool and Diesel errors to [`PersistenceError`].
//! - Disambiguation of conditional writes that touched zero rows.

use tracing::debug;

use crate::domain::ports::PersistenceError;

use super::pool::PoolError;

/// Map pool errors to connection failures.
pub(crate) fn map_pool_error(error: PoolError) -> PersistenceError {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Unresponsive { message } => {
            PersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to persistence errors, logging the underlying cause.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> PersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => PersistenceError::missing(),
        DieselError::QueryBuilderError(_) => PersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            PersistenceError::duplicate(info.constraint_name().unwrap_or("unique constraint"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => PersistenceError::query("database error"),
        _ => PersistenceError::query("database error"),
    }
}

/// Outcome of a conditional write that matched no row.
///
/// The row either still exists with a newer `updated_at` (the caller lost a
/// race) or it has been removed.
pub(crate) fn stale_or_missing(exists: bool) -> PersistenceError {
    if exists {
        PersistenceError::stale_write()
    } else {
        PersistenceError::missing()
    }
}

/// Disambiguate a conditional write that affected zero rows.
///
/// Expands to an expression of type [`PersistenceError`]; lookup failures
/// are returned early with `?`.
#[macro_export]
macro_rules! zero_rows_error {
    ($conn:expr, $table:expr, $id_column:expr, $id:expr) => {{
        use diesel::prelude::*;
        use diesel_async::RunQueryDsl;
        use $crate::outbound::persistence::diesel_helpers::{map_diesel_error, stale_or_missing};

        let exists: bool = diesel::select(diesel::dsl::exists($table.filter($id_column.eq($id))))
            .get_result($conn)
            .await
            .map_err(map_diesel_error)?;
        stale_or_missing(exists)
    }};
}
