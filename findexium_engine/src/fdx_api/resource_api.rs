//! Generic CRUD API for the trading reference data.
use std::fmt::Debug;

use log::debug;

use crate::{
    db_types::Record,
    resource_types::{Resource, ResourcePayload},
    traits::ResourceManagement,
    ResourceApiError,
};

/// One `ResourceApi` serves every resource type its backend supports. The resource type is picked per call, e.g.
/// `api.fetch_all::<Bid>()`.
pub struct ResourceApi<B> {
    db: B,
}

impl<B: Debug> Debug for ResourceApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResourceApi ({:?})", self.db)
    }
}

impl<B> ResourceApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn fetch_all<R>(&self) -> Result<Vec<Record<R>>, ResourceApiError>
    where
        R: Resource,
        B: ResourceManagement<R>,
    {
        self.db.fetch_all().await
    }

    pub async fn fetch_by_id<R>(&self, id: i64) -> Result<Option<Record<R>>, ResourceApiError>
    where
        R: Resource,
        B: ResourceManagement<R>,
    {
        self.db.fetch_by_id(id).await
    }

    /// Validates the new resource and stores it.
    pub async fn create<R>(&self, data: R) -> Result<Record<R>, ResourceApiError>
    where
        R: Resource,
        B: ResourceManagement<R>,
    {
        validate(&data)?;
        let record = self.db.insert(&data).await?;
        debug!("Created {} #{}", R::NAME, record.id);
        Ok(record)
    }

    /// Replaces the resource with the given id. An id in the payload must agree with `id`.
    ///
    /// Returns `None` if there is no resource with that id.
    pub async fn update<R>(&self, id: i64, payload: ResourcePayload<R>) -> Result<Option<Record<R>>, ResourceApiError>
    where
        R: Resource,
        B: ResourceManagement<R>,
    {
        if let Some(body_id) = payload.id {
            if body_id != id {
                return Err(ResourceApiError::IdMismatch { path: id, body: body_id });
            }
        }
        validate(&payload.data)?;
        self.db.update(id, &payload.data).await
    }

    pub async fn delete<R>(&self, id: i64) -> Result<bool, ResourceApiError>
    where
        R: Resource,
        B: ResourceManagement<R>,
    {
        let deleted = self.db.delete(id).await?;
        if deleted {
            debug!("Deleted {} #{id}", R::NAME);
        }
        Ok(deleted)
    }
}

fn validate<R: Resource>(data: &R) -> Result<(), ResourceApiError> {
    data.validate().map_err(|reason| ResourceApiError::ValidationError { resource: R::NAME, reason })
}
