use crate::{db_types::Record, resource_types::Resource, ResourceApiError};

/// Persistence for a single resource type. Every operation touches exactly one table and is attempted once.
#[allow(async_fn_in_trait)]
pub trait ResourceManagement<R: Resource> {
    async fn fetch_all(&self) -> Result<Vec<Record<R>>, ResourceApiError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Record<R>>, ResourceApiError>;

    async fn insert(&self, data: &R) -> Result<Record<R>, ResourceApiError>;

    /// Replaces every field of the record. Returns `None` if no record has the given id.
    async fn update(&self, id: i64, data: &R) -> Result<Option<Record<R>>, ResourceApiError>;

    /// Returns `false` if no record has the given id.
    async fn delete(&self, id: i64) -> Result<bool, ResourceApiError>;
}
