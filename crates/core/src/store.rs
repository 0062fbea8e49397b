//! Record-store collaborator contract.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::record::{PropertyPatch, RawRow};

/// The external system of record holding the trackable rows.
///
/// Implementations perform the actual network I/O; the sync driver only
/// depends on this seam.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every row of the tracked database in one batched call.
    async fn fetch_all_rows(&self) -> Result<Vec<RawRow>, StoreError>;

    /// Apply a partial property update to one row.
    async fn update_row_properties(
        &self,
        row_id: &str,
        properties: PropertyPatch,
    ) -> Result<(), StoreError>;
}
