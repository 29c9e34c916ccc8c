//! CRUD routes for the trading reference data.
//!
//! Every resource type gets the same five routes, registered under its own path by [`ResourceRoutes`]:
//!
//! | Method | Path          | Policy        | Success                      |
//! |--------|---------------|---------------|------------------------------|
//! | GET    | `{path}`      | Admin or User | 200, all records             |
//! | GET    | `{path}/{id}` | Admin or User | 200, the record; 404 if none |
//! | POST   | `{path}`      | Admin or User | 201 with a `Location` header |
//! | PUT    | `{path}/{id}` | Admin or User | 200, the record; 404 if none |
//! | DELETE | `{path}/{id}` | Admin         | 204; 404 if none             |
use std::marker::PhantomData;

use actix_web::{
    dev::{AppService, HttpServiceFactory},
    guard,
    http::header,
    web,
    HttpRequest,
    HttpResponse,
};
use findexium_engine::{
    resource_types::{Resource, ResourcePayload},
    traits::ResourceManagement,
    ResourceApi,
};
use log::*;

use crate::{
    auth::{AccessPolicy, JwtClaims},
    errors::ServerError,
    middleware::AclMiddlewareFactory,
};

/// Registers the CRUD routes for resource type `R`, stored in backend `B`, under `path`.
///
/// Web-actix cannot handle generics in handlers, so the handlers are monomorphised here, in the same way that the
/// `route!` macro does it for single routes.
pub struct ResourceRoutes<B, R> {
    path: &'static str,
    _marker: PhantomData<fn() -> (B, R)>,
}

impl<B, R> ResourceRoutes<B, R> {
    pub fn new(path: &'static str) -> Self {
        Self { path, _marker: PhantomData }
    }
}

impl<B, R> HttpServiceFactory for ResourceRoutes<B, R>
where
    B: ResourceManagement<R> + 'static,
    R: Resource,
{
    fn register(self, config: &mut AppService) {
        let item_path = format!("{}/{{id}}", self.path);
        let list = actix_web::Resource::new(self.path)
            .name(&format!("list_{}", R::NAME))
            .guard(guard::Get())
            .to(list_resources::<B, R>)
            .wrap(AclMiddlewareFactory::new(AccessPolicy::admin_or_user()));
        let get = actix_web::Resource::new(item_path.as_str())
            .name(&format!("get_{}", R::NAME))
            .guard(guard::Get())
            .to(resource_by_id::<B, R>)
            .wrap(AclMiddlewareFactory::new(AccessPolicy::admin_or_user()));
        let create = actix_web::Resource::new(self.path)
            .name(&format!("create_{}", R::NAME))
            .guard(guard::Post())
            .to(create_resource::<B, R>)
            .wrap(AclMiddlewareFactory::new(AccessPolicy::admin_or_user()));
        let update = actix_web::Resource::new(item_path.as_str())
            .name(&format!("update_{}", R::NAME))
            .guard(guard::Put())
            .to(update_resource::<B, R>)
            .wrap(AclMiddlewareFactory::new(AccessPolicy::admin_or_user()));
        let delete = actix_web::Resource::new(item_path.as_str())
            .name(&format!("delete_{}", R::NAME))
            .guard(guard::Delete())
            .to(delete_resource::<B, R>)
            .wrap(AclMiddlewareFactory::new(AccessPolicy::admin_only()));
        HttpServiceFactory::register(list, config);
        HttpServiceFactory::register(get, config);
        HttpServiceFactory::register(create, config);
        HttpServiceFactory::register(update, config);
        HttpServiceFactory::register(delete, config);
    }
}

pub async fn list_resources<B, R>(
    claims: JwtClaims,
    api: web::Data<ResourceApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: ResourceManagement<R>,
    R: Resource,
{
    debug!("💻️ GET all {} records for {}", R::NAME, claims.username);
    let records = api.fetch_all::<R>().await?;
    Ok(HttpResponse::Ok().json(records))
}

pub async fn resource_by_id<B, R>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<ResourceApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: ResourceManagement<R>,
    R: Resource,
{
    let id = path.into_inner();
    debug!("💻️ GET {} #{id} for {}", R::NAME, claims.username);
    let record = api.fetch_by_id::<R>(id).await?.ok_or_else(|| not_found::<R>(id))?;
    Ok(HttpResponse::Ok().json(record))
}

/// Any `id` in the body is ignored. Ids are assigned by the database.
pub async fn create_resource<B, R>(
    req: HttpRequest,
    claims: JwtClaims,
    body: web::Json<R>,
    api: web::Data<ResourceApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: ResourceManagement<R>,
    R: Resource,
{
    let record = api.create(body.into_inner()).await?;
    info!("💻️ {} #{} was created by {}", R::NAME, record.id, claims.username);
    let location = format!("{}/{}", req.path().trim_end_matches('/'), record.id);
    Ok(HttpResponse::Created().insert_header((header::LOCATION, location)).json(record))
}

pub async fn update_resource<B, R>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<ResourcePayload<R>>,
    api: web::Data<ResourceApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: ResourceManagement<R>,
    R: Resource,
{
    let id = path.into_inner();
    let record = api.update(id, body.into_inner()).await?.ok_or_else(|| not_found::<R>(id))?;
    info!("💻️ {} #{id} was updated by {}", R::NAME, claims.username);
    Ok(HttpResponse::Ok().json(record))
}

pub async fn delete_resource<B, R>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<ResourceApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: ResourceManagement<R>,
    R: Resource,
{
    let id = path.into_inner();
    if !api.delete::<R>(id).await? {
        return Err(not_found::<R>(id));
    }
    info!("💻️ {} #{id} was deleted by {}", R::NAME, claims.username);
    Ok(HttpResponse::NoContent().finish())
}

fn not_found<R: Resource>(id: i64) -> ServerError {
    ServerError::NoRecordFound(format!("{} #{id}", R::NAME))
}
