use std::time::Duration;

use actix_web::{
    dev::Server,
    error::{JsonPayloadError, PathError},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
};
use findexium_engine::{
    resource_types::{Bid, CurvePoint, Rating, RuleName, Trade},
    seed_roles_and_admin,
    AuthApi,
    ResourceApi,
    SqliteDatabase,
    UserApi,
};
use log::*;

use crate::{
    auth::TokenIssuer,
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    middleware::JwtAuthenticationFactory,
    resource_routes::ResourceRoutes,
    routes::{
        health,
        not_found,
        CreateUserRoute,
        DeleteUserRoute,
        LoginRoute,
        LogoutRoute,
        UpdateUserRoute,
        UserByIdRoute,
        UsersRoute,
    },
};

/// Opens the database, brings the schema up to date, seeds the roles and the bootstrap administrator, and then runs
/// the server until it is shut down.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if seed_roles_and_admin(db.clone(), &config.admin).await? {
        warn!("🌱️ A new administrator account was created for {}", config.admin.email);
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let auth_api = AuthApi::new(db.clone());
        let user_api = UserApi::new(db.clone());
        let resource_api = ResourceApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let app = App::new()
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(user_api))
            .app_data(web::Data::new(resource_api))
            .app_data(web::Data::new(jwt_signer.clone()))
            .app_data(web::Data::new(options))
            .app_data(json_config())
            .app_data(path_config())
            .wrap(JwtAuthenticationFactory::new(jwt_signer))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("fdx::access_log"));
        // Authorization is checked per route. See `route!` and `ResourceRoutes`.
        let api_scope = web::scope("/api")
            .service(UsersRoute::<SqliteDatabase>::new())
            .service(CreateUserRoute::<SqliteDatabase>::new())
            .service(UserByIdRoute::<SqliteDatabase>::new())
            .service(UpdateUserRoute::<SqliteDatabase>::new())
            .service(DeleteUserRoute::<SqliteDatabase>::new())
            .service(ResourceRoutes::<SqliteDatabase, Bid>::new("/bid"))
            .service(ResourceRoutes::<SqliteDatabase, Trade>::new("/trade"))
            .service(ResourceRoutes::<SqliteDatabase, CurvePoint>::new("/curve"))
            .service(ResourceRoutes::<SqliteDatabase, Rating>::new("/rating"))
            .service(ResourceRoutes::<SqliteDatabase, RuleName>::new("/rulename"));
        app.service(health)
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(LogoutRoute::new())
            .service(api_scope)
            .default_service(web::to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported with the same `{"error": ...}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Rejected request body. {e}");
        ServerError::InvalidRequestBody(e.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|e: PathError, _req: &HttpRequest| {
        debug!("💻️ Rejected request path. {e}");
        ServerError::InvalidRequestPath(e.to_string()).into()
    })
}
