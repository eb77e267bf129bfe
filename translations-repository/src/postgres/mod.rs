//! PostgreSQL implementations of the repository traits.
//!
//! Migrations under `src/postgres/migrations` are embedded at compile time and
//! applied by [`PostgresTranslationRepository::migrate`].
mod source_reader;
mod translations_repository;

pub use source_reader::PostgresSourceReader;
pub use translations_repository::PostgresTranslationRepository;

use sqlx::postgres::PgPoolOptions;

use crate::errors::TranslationRepositoryError;

/// Opens a connection pool with the given size limit.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
) -> Result<sqlx::PgPool, TranslationRepositoryError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}
