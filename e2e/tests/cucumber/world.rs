use std::{collections::HashMap, sync::mpsc::channel};

use actix_web::dev::ServerHandle;
use chrono::Duration;
use cucumber::World;
use fdx_common::Secret;
use findexium_engine::{
    db_types::UserId,
    seed_roles_and_admin,
    test_utils::prepare_env::{create_database, random_db_path, run_migrations},
    BootstrapAdmin,
    SqliteDatabase,
};
use findexium_server::{
    auth::{JwtClaims, TokenIssuer},
    config::{AuthConfig, ServerConfig},
    server::create_server_instance,
};
use log::*;
use reqwest::{Client, Method, RequestBuilder, StatusCode};

pub const ADMIN_EMAIL: &str = "admin@findexium.com";
pub const ADMIN_PASSWORD: &str = "Admin123456789!";
// DO NOT re-use this secret anywhere.
const E2E_SECRET: &str = "e2e-tests-only-secret-0123456789abcdef";

#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, World)]
pub struct FdxWorld {
    pub config: ServerConfig,
    pub url: String,
    pub db: Option<SqliteDatabase>,
    pub server_handle: Option<ServerHandle>,
    // Users created by the scenario, by name
    pub users: HashMap<String, UserInfo>,
    // The access token received from the server if a successful login was made
    pub access_token: Option<String>,
    pub logged_in: bool,
    pub response: Option<(StatusCode, String)>,
    // The id of the last record created through the API
    pub last_id: Option<i64>,
}

impl Default for FdxWorld {
    fn default() -> Self {
        let _ = env_logger::try_init().ok();
        let url = random_db_path();
        let auth = AuthConfig::new(Secret::new(E2E_SECRET.into()), "findexium", "findexium-clients", Duration::minutes(5))
            .expect("Invalid e2e auth config");
        let admin = BootstrapAdmin {
            email: ADMIN_EMAIL.into(),
            username: "admin".into(),
            password: Secret::new(ADMIN_PASSWORD.into()),
        };
        let port = 20000 + rand::random::<u16>() % 10_000;
        let config = ServerConfig::new("127.0.0.1", port, &url, auth, admin);
        Self {
            config,
            url,
            db: None,
            server_handle: None,
            users: HashMap::new(),
            response: None,
            access_token: None,
            logged_in: false,
            last_id: None,
        }
    }
}

impl FdxWorld {
    /// Creates a fresh database and seeds the roles and the bootstrap administrator, just like the server does on
    /// start-up.
    pub async fn start_database(&mut self) {
        create_database(&self.url).await;
        run_migrations(&self.url).await;
        let db = SqliteDatabase::new_with_url(&self.url, 1).await.expect("Error creating connection to database");
        seed_roles_and_admin(db.clone(), &self.config.admin).await.expect("Error seeding database");
        debug!("🌍️ Created database: {}", self.url);
        self.db = Some(db);
    }

    pub fn database(&self) -> &SqliteDatabase {
        self.db.as_ref().expect("Database not started")
    }

    pub async fn start_server(&mut self) {
        let config = self.config.clone();
        let db = self.database().clone();
        info!("🌍️ Starting server on {}:{} using DB {}", config.host, config.port, db.url());
        let (tx, rx) = channel();
        tokio::spawn(async move {
            let srv = create_server_instance(config, db).expect("Error creating server instance");
            let _res = tx.send(srv.handle());
            match srv.await {
                Ok(_) => info!("🌍️ Server shut down"),
                Err(e) => warn!("🌍️ Server error: {e}"),
            }
        });
        let handle = rx.recv().unwrap();
        info!("🌍️ Server started");
        self.server_handle = Some(handle);
    }

    pub fn user(&self, name: &str) -> &UserInfo {
        self.users.get(name).unwrap_or_else(|| panic!("User {name} has not been created"))
    }

    /// Decodes the current access token with the server's own settings.
    pub fn access_claims(&self) -> JwtClaims {
        let token = self.access_token.as_ref().expect("No access token");
        TokenIssuer::new(&self.config.auth).validate_token(token).expect("Invalid access token")
    }

    /// Replaces `{Name}` with the id of a user created in this scenario, and `{last}` with the id of the last record
    /// that was created.
    pub fn expand_path(&self, path: &str) -> String {
        let mut path = path.to_string();
        for (name, user) in &self.users {
            path = path.replace(&format!("{{{name}}}"), user.id.as_str());
        }
        if let Some(id) = self.last_id {
            path = path.replace("{last}", &id.to_string());
        }
        path
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.request(Method::GET, path, |req| req).await
    }

    pub async fn request<F>(&self, method: Method, path: &str, req: F) -> (StatusCode, String)
    where F: FnOnce(RequestBuilder) -> RequestBuilder {
        let url = format!("http://{}:{}{}", self.config.host, self.config.port, self.expand_path(path));
        debug!("🌍️ Querying {url}");
        let client = Client::new();
        let request = client.request(method, url);
        let mut request = req(request);
        if let Some(token) = &self.access_token {
            debug!("🌍️ Adding auth token to request");
            request = request.bearer_auth(token);
        }
        let res = request.send().await.expect("Error getting response");
        let code = res.status();
        let body = res.text().await.expect("Error parsing response body");
        (code, body)
    }
}
