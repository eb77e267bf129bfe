use translations_shared::{EntityKind, SourceRecord};

use crate::errors::TranslationRepositoryError;

/// Read access to the authoritative entity tables that overlays attach to.
///
/// The overlay store never writes to these tables; backfill only reads the
/// current text of each translatable field.
#[async_trait::async_trait]
pub trait SourceRecordReader: Send + Sync {
    /// Returns every row of `kind`'s table, ordered by id, reduced to its
    /// translatable fields.
    async fn fetch_records(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<SourceRecord>, TranslationRepositoryError>;
}
