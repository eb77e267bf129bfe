//! PostgreSQL implementation of the translation repository.
//!
//! All rows live in the single `translations` table. The unique constraint on
//! `(table_name, record_id, field_name, language_code)` is what enforces the
//! one-entry-per-coordinate invariant; every write here resolves conflicts in
//! the same statement that performs it.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::PgPool`
//! - Upserts with `ON CONFLICT DO UPDATE`, reporting created vs updated
//! - Batched record reads with `record_id = ANY($2)`
//! - Bulk seeding using PostgreSQL's `UNNEST`
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::debug;
use translations_shared::{
    Coordinate, EntityKind, LanguageCode, LanguageStats, RecordId, SeedEntry, SeedMode,
    TranslationEntry, UpsertOutcome,
};

use crate::{FieldValue, TranslationRepository, TranslationRepositoryError};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("src/postgres/migrations");

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    table_name: String,
    record_id: i64,
    field_name: String,
    language_code: String,
    translated_value: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EntryRow> for TranslationEntry {
    fn from(row: EntryRow) -> Self {
        TranslationEntry {
            id: row.id,
            table_name: row.table_name,
            record_id: row.record_id,
            field_name: row.field_name,
            language_code: row.language_code,
            translated_value: row.translated_value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FieldValueRow {
    record_id: i64,
    field_name: String,
    translated_value: Option<String>,
}

impl From<FieldValueRow> for FieldValue {
    fn from(row: FieldValueRow) -> Self {
        FieldValue {
            record_id: row.record_id,
            field_name: row.field_name,
            translated_value: row.translated_value,
        }
    }
}

/// PostgreSQL implementation of the translation repository.
///
/// The pool is injected by the composing application, which owns its
/// lifecycle; the repository holds no other state.
#[derive(Clone)]
pub struct PostgresTranslationRepository {
    pool: sqlx::PgPool,
}

impl PostgresTranslationRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresTranslationRepository)` - Ready-to-use repository instance
    /// * `Err(TranslationRepositoryError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, TranslationRepositoryError> {
        Ok(Self { pool })
    }

    /// Applies the embedded migrations, creating the overlay table and its
    /// indexes if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), TranslationRepositoryError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

/// Collapses duplicate coordinates, keeping the last value seen for each.
///
/// PostgreSQL refuses an `ON CONFLICT DO UPDATE` statement that would touch
/// the same row twice, so a bulk seed must never carry a coordinate more
/// than once. First-seen order is preserved.
pub(crate) fn dedupe_seed_entries(entries: &[SeedEntry]) -> Vec<&SeedEntry> {
    let mut positions: HashMap<&Coordinate, usize> = HashMap::with_capacity(entries.len());
    let mut unique: Vec<&SeedEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match positions.get(&entry.coordinate) {
            Some(&position) => unique[position] = entry,
            None => {
                positions.insert(&entry.coordinate, unique.len());
                unique.push(entry);
            }
        }
    }
    unique
}

#[async_trait]
impl TranslationRepository for PostgresTranslationRepository {
    async fn find_value(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<Option<String>>, TranslationRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT translated_value
            FROM translations
            WHERE table_name = $1 AND record_id = $2 AND field_name = $3 AND language_code = $4
            "#,
        )
        .bind(coordinate.kind().as_str())
        .bind(coordinate.record_id())
        .bind(coordinate.field().as_str())
        .bind(coordinate.language().as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_get::<Option<String>, _>("translated_value"))
            .transpose()
            .map_err(TranslationRepositoryError::from)
    }

    async fn find_entry(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Option<TranslationEntry>, TranslationRepositoryError> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, table_name, record_id, field_name, language_code,
                   translated_value, created_at, updated_at
            FROM translations
            WHERE table_name = $1 AND record_id = $2 AND field_name = $3 AND language_code = $4
            "#,
        )
        .bind(coordinate.kind().as_str())
        .bind(coordinate.record_id())
        .bind(coordinate.field().as_str())
        .bind(coordinate.language().as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TranslationEntry::from))
    }

    async fn find_record(
        &self,
        kind: EntityKind,
        record_id: RecordId,
        language: &LanguageCode,
    ) -> Result<Vec<FieldValue>, TranslationRepositoryError> {
        let rows = sqlx::query_as::<_, FieldValueRow>(
            r#"
            SELECT record_id, field_name, translated_value
            FROM translations
            WHERE table_name = $1 AND record_id = $2 AND language_code = $3
            ORDER BY field_name
            "#,
        )
        .bind(kind.as_str())
        .bind(record_id)
        .bind(language.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FieldValue::from).collect())
    }

    /// Uses one `= ANY($2)` statement so the whole page is read as a single
    /// snapshot instead of one racing query per id.
    async fn find_records(
        &self,
        kind: EntityKind,
        record_ids: &[RecordId],
        language: &LanguageCode,
    ) -> Result<Vec<FieldValue>, TranslationRepositoryError> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, FieldValueRow>(
            r#"
            SELECT record_id, field_name, translated_value
            FROM translations
            WHERE table_name = $1 AND record_id = ANY($2) AND language_code = $3
            ORDER BY record_id, field_name
            "#,
        )
        .bind(kind.as_str())
        .bind(record_ids)
        .bind(language.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FieldValue::from).collect())
    }

    /// `xmax = 0` holds only for a tuple created by this statement, which is
    /// how the single statement tells an insert from a conflict update.
    async fn upsert(
        &self,
        coordinate: &Coordinate,
        value: Option<&str>,
    ) -> Result<UpsertOutcome, TranslationRepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO translations (table_name, record_id, field_name, language_code, translated_value)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (table_name, record_id, field_name, language_code)
            DO UPDATE SET
                translated_value = EXCLUDED.translated_value,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(coordinate.kind().as_str())
        .bind(coordinate.record_id())
        .bind(coordinate.field().as_str())
        .bind(coordinate.language().as_str())
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        let inserted: bool = row.try_get("inserted")?;
        Ok(UpsertOutcome::from_inserted(inserted))
    }

    async fn update_existing(
        &self,
        coordinate: &Coordinate,
        value: Option<&str>,
    ) -> Result<bool, TranslationRepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE translations
            SET translated_value = $5, updated_at = NOW()
            WHERE table_name = $1 AND record_id = $2 AND field_name = $3 AND language_code = $4
            "#,
        )
        .bind(coordinate.kind().as_str())
        .bind(coordinate.record_id())
        .bind(coordinate.field().as_str())
        .bind(coordinate.language().as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_one(&self, coordinate: &Coordinate) -> Result<bool, TranslationRepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM translations
            WHERE table_name = $1 AND record_id = $2 AND field_name = $3 AND language_code = $4
            "#,
        )
        .bind(coordinate.kind().as_str())
        .bind(coordinate.record_id())
        .bind(coordinate.field().as_str())
        .bind(coordinate.language().as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_record(
        &self,
        kind: EntityKind,
        record_id: RecordId,
    ) -> Result<u64, TranslationRepositoryError> {
        let result = sqlx::query("DELETE FROM translations WHERE table_name = $1 AND record_id = $2")
            .bind(kind.as_str())
            .bind(record_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn bulk_seed(
        &self,
        entries: &[SeedEntry],
        mode: SeedMode,
    ) -> Result<u64, TranslationRepositoryError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let unique = dedupe_seed_entries(entries);
        let table_names: Vec<&str> = unique.iter().map(|e| e.coordinate.kind().as_str()).collect();
        let record_ids: Vec<i64> = unique.iter().map(|e| e.coordinate.record_id()).collect();
        let field_names: Vec<&str> = unique.iter().map(|e| e.coordinate.field().as_str()).collect();
        let language_codes: Vec<&str> = unique.iter().map(|e| e.coordinate.language().as_str()).collect();
        let values: Vec<Option<String>> = unique.iter().map(|e| e.value.clone()).collect();

        let conflict_clause = match mode {
            SeedMode::IfAbsent => "DO NOTHING",
            SeedMode::Overwrite => {
                "DO UPDATE SET translated_value = EXCLUDED.translated_value, updated_at = NOW()"
            }
        };

        let statement = format!(
            r#"
            INSERT INTO translations (table_name, record_id, field_name, language_code, translated_value)
            SELECT * FROM UNNEST($1::text[], $2::bigint[], $3::text[], $4::text[], $5::text[])
            ON CONFLICT (table_name, record_id, field_name, language_code)
            {conflict_clause}
            "#
        );

        let result = sqlx::query(&statement)
            .bind(&table_names)
            .bind(&record_ids)
            .bind(&field_names)
            .bind(&language_codes)
            .bind(&values)
            .execute(&self.pool)
            .await?;

        debug!(
            requested = entries.len(),
            unique = unique.len(),
            written = result.rows_affected(),
            mode = ?mode,
            "Bulk seed statement executed"
        );

        Ok(result.rows_affected())
    }

    async fn language_stats(&self) -> Result<Vec<LanguageStats>, TranslationRepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT language_code,
                   COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE translated_value IS NOT NULL AND translated_value <> '') AS completed
            FROM translations
            GROUP BY language_code
            ORDER BY language_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = Vec::with_capacity(rows.len());
        for row in rows {
            stats.push(LanguageStats {
                language_code: row.try_get("language_code")?,
                total: row.try_get("total")?,
                completed: row.try_get("completed")?,
            });
        }
        Ok(stats)
    }

    async fn distinct_languages(&self) -> Result<Vec<String>, TranslationRepositoryError> {
        let languages = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT language_code FROM translations ORDER BY language_code",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(languages)
    }

    async fn list_language(
        &self,
        language: &LanguageCode,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TranslationEntry>, TranslationRepositoryError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, table_name, record_id, field_name, language_code,
                   translated_value, created_at, updated_at
            FROM translations
            WHERE language_code = $1
            ORDER BY table_name, record_id, field_name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(language.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TranslationEntry::from).collect())
    }

    async fn check_tables_created(&self) -> Result<bool, TranslationRepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind("translations")
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translations_shared::LanguageCode;

    fn entry(record_id: i64, language: &str, value: &str) -> SeedEntry {
        SeedEntry {
            coordinate: Coordinate::parse("employees", record_id, "name", language).unwrap(),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn test_dedupe_keeps_last_value_in_first_position() {
        let entries = vec![entry(1, "sq", "Alma"), entry(2, "sq", "Besa"), entry(1, "sq", "Alma B.")];
        let unique = dedupe_seed_entries(&entries);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].coordinate.record_id(), 1);
        assert_eq!(unique[0].value.as_deref(), Some("Alma B."));
        assert_eq!(unique[1].coordinate.record_id(), 2);
    }

    #[test]
    fn test_dedupe_distinguishes_languages() {
        let entries = vec![entry(1, "sq", "Alma"), entry(1, "en", "Alma")];
        let unique = dedupe_seed_entries(&entries);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[1].coordinate.language(), &LanguageCode::new("en").unwrap());
    }

    #[test]
    fn test_dedupe_empty() {
        assert!(dedupe_seed_entries(&[]).is_empty());
    }
}
