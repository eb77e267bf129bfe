//! PostgreSQL reader over the authoritative entity tables.
//!
//! Statement text is assembled only from [`EntityKind`] and
//! [`TranslatableField`] names, never from caller input.
use async_trait::async_trait;
use sqlx::Row;
use translations_shared::{EntityKind, SourceRecord, TranslatableField};

use crate::{SourceRecordReader, TranslationRepositoryError};

/// Reads translatable columns from the `employees`, `contracts` and `tasks`
/// tables sharing the overlay store's database.
#[derive(Clone)]
pub struct PostgresSourceReader {
    pool: sqlx::PgPool,
}

impl PostgresSourceReader {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

/// Builds the select for one kind, casting every column to text so that
/// differently typed source columns decode uniformly.
pub(crate) fn select_statement(kind: EntityKind) -> String {
    let columns = kind
        .translatable_fields()
        .iter()
        .map(|field| format!("{0}::text AS {0}", field.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT id::bigint AS id, {} FROM {} ORDER BY id",
        columns,
        kind.as_str()
    )
}

#[async_trait]
impl SourceRecordReader for PostgresSourceReader {
    async fn fetch_records(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<SourceRecord>, TranslationRepositoryError> {
        let rows = sqlx::query(&select_statement(kind))
            .fetch_all(&self.pool)
            .await?;

        let fields: &[TranslatableField] = kind.translatable_fields();
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut record = SourceRecord::new(kind, row.try_get("id")?);
            for field in fields {
                let value: Option<String> = row.try_get(field.as_str())?;
                record.fields.push((*field, value));
            }
            records.push(record);
        }
        Ok(records)
    }
}
