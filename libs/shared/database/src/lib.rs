pub mod supabase;

pub use supabase::{eq_filter, prefer_headers, DbError, SupabaseClient};

use shared_models::error::AppError;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => AppError::NotFound(msg),
            DbError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}
