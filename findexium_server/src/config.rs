//! Server configuration.
//!
//! All configuration is read from environment variables (a `.env` file in the working directory is loaded first).
//!
//! | Variable                   | Default               | Notes                                                 |
//! |----------------------------|-----------------------|-------------------------------------------------------|
//! | `FDX_HOST`                 | 127.0.0.1             |                                                       |
//! | `FDX_PORT`                 | 8360                  |                                                       |
//! | `FDX_DATABASE_URL`         | (none)                | e.g. `sqlite://data/findexium.db`                     |
//! | `FDX_JWT_SECRET`           | (none, required)      | At least 32 bytes. The server will not start without. |
//! | `FDX_JWT_ISSUER`           | findexium             |                                                       |
//! | `FDX_JWT_AUDIENCE`         | findexium-clients     |                                                       |
//! | `FDX_JWT_LIFETIME_MINUTES` | 120                   |                                                       |
//! | `FDX_USE_X_FORWARDED_FOR`  | false                 | Trust `X-Forwarded-For` for the client address        |
//! | `FDX_USE_FORWARDED`        | false                 | Trust `Forwarded` for the client address              |
//! | `FDX_ADMIN_EMAIL`          | admin@findexium.com   | Bootstrap administrator                               |
//! | `FDX_ADMIN_USERNAME`       | admin                 |                                                       |
//! | `FDX_ADMIN_PASSWORD`       | (random)              | A random password is generated if unset               |
use std::{env, io::Write};

use chrono::Duration;
use fdx_common::{parse_boolean_flag, Secret};
use findexium_engine::BootstrapAdmin;
use log::*;
use rand::{distributions::Alphanumeric, Rng};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_FDX_HOST: &str = "127.0.0.1";
const DEFAULT_FDX_PORT: u16 = 8360;
const DEFAULT_JWT_ISSUER: &str = "findexium";
const DEFAULT_JWT_AUDIENCE: &str = "findexium-clients";
const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 120;
/// Longer lifetimes are refused at start-up.
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 365;
const DEFAULT_ADMIN_EMAIL: &str = "admin@findexium.com";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// HS256 keys shorter than the hash output are rejected.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    /// The administrator account that is created on first start.
    pub admin: BootstrapAdmin,
}

impl ServerConfig {
    pub fn new(host: &str, port: u16, database_url: &str, auth: AuthConfig, admin: BootstrapAdmin) -> Self {
        Self {
            host: host.to_string(),
            port,
            database_url: database_url.to_string(),
            auth,
            use_x_forwarded_for: false,
            use_forwarded: false,
            admin,
        }
    }

    /// Loads the configuration from the environment. Missing optional values fall back to defaults, with a log
    /// message. A missing or unusable JWT configuration is an error, since tokens could not be issued safely.
    pub fn try_from_env() -> Result<Self, ServerError> {
        let host = env::var("FDX_HOST").ok().unwrap_or_else(|| DEFAULT_FDX_HOST.into());
        let port = env::var("FDX_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FDX_PORT. {e} Using the default, {DEFAULT_FDX_PORT}, instead."
                    );
                    DEFAULT_FDX_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FDX_PORT);
        let database_url = env::var("FDX_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ FDX_DATABASE_URL is not set. Please set it to the URL for the Findexium database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env()?;
        let use_x_forwarded_for = parse_boolean_flag(env::var("FDX_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("FDX_USE_FORWARDED").ok(), false);
        let admin = bootstrap_admin_from_env();
        Ok(Self { host, port, database_url, auth, use_x_forwarded_for, use_forwarded, admin })
    }
}

fn bootstrap_admin_from_env() -> BootstrapAdmin {
    let email = env::var("FDX_ADMIN_EMAIL").ok().unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.into());
    let username = env::var("FDX_ADMIN_USERNAME").ok().unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.into());
    let password = match env::var("FDX_ADMIN_PASSWORD") {
        Ok(p) if !p.trim().is_empty() => p,
        _ => random_admin_password(),
    };
    BootstrapAdmin { email, username, password: Secret::new(password) }
}

/// Generates a password that satisfies the password policy and stashes it in a temporary file, since it is the only
/// way into a fresh installation.
fn random_admin_password() -> String {
    let random: String = rand::thread_rng().sample_iter(&Alphanumeric).take(24).map(char::from).collect();
    let password = format!("{random}aA1");
    warn!(
        "🚨️🚨️🚨️ FDX_ADMIN_PASSWORD has not been set. If the administrator account does not exist yet, it will be \
         created with a random password. 🚨️🚨️🚨️"
    );
    let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
    match &mut tmpfile {
        Some((f, p)) => match writeln!(f, "{password}") {
            Ok(()) => warn!(
                "🚨️🚨️🚨️ The generated administrator password was written to {}. Log in, change it, and delete the \
                 file. If this is a production instance, set FDX_ADMIN_PASSWORD instead. 🚨️🚨️🚨️",
                p.to_str().unwrap_or("???")
            ),
            Err(e) => warn!("🪛️ Could not write the administrator password to the temporary file. {e}"),
        },
        None => warn!("🪛️ Could not create a temporary file to store the administrator password."),
    }
    password
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to sign and verify access tokens (HMAC-SHA256).
    pub jwt_secret: Secret<String>,
    /// The `iss` claim written into, and required from, every access token.
    pub issuer: String,
    /// The `aud` claim written into, and required from, every access token.
    pub audience: String,
    /// How long an access token stays valid after it is issued.
    pub token_lifetime: Duration,
}

impl AuthConfig {
    /// Builds a validated configuration. Checking here means a bad secret stops the server at start-up rather than
    /// failing on the first login.
    pub fn new(
        jwt_secret: Secret<String>,
        issuer: &str,
        audience: &str,
        token_lifetime: Duration,
    ) -> Result<Self, ServerError> {
        if jwt_secret.reveal().len() < MIN_JWT_SECRET_LENGTH {
            return Err(ServerError::ConfigurationError(format!(
                "The JWT signing secret must be at least {MIN_JWT_SECRET_LENGTH} bytes long."
            )));
        }
        if issuer.trim().is_empty() || audience.trim().is_empty() {
            return Err(ServerError::ConfigurationError("The JWT issuer and audience cannot be empty.".into()));
        }
        if token_lifetime <= Duration::zero() {
            return Err(ServerError::ConfigurationError("The token lifetime must be positive.".into()));
        }
        if token_lifetime > Duration::days(MAX_TOKEN_LIFETIME_DAYS) {
            return Err(ServerError::ConfigurationError(format!(
                "The token lifetime cannot be longer than {MAX_TOKEN_LIFETIME_DAYS} days."
            )));
        }
        Ok(Self { jwt_secret, issuer: issuer.trim().to_string(), audience: audience.trim().to_string(), token_lifetime })
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("FDX_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [FDX_JWT_SECRET]")))?;
        let issuer = env::var("FDX_JWT_ISSUER").ok().unwrap_or_else(|| {
            info!("🪛️ FDX_JWT_ISSUER is not set. Using the default value, {DEFAULT_JWT_ISSUER}.");
            DEFAULT_JWT_ISSUER.into()
        });
        let audience = env::var("FDX_JWT_AUDIENCE").ok().unwrap_or_else(|| {
            info!("🪛️ FDX_JWT_AUDIENCE is not set. Using the default value, {DEFAULT_JWT_AUDIENCE}.");
            DEFAULT_JWT_AUDIENCE.into()
        });
        let token_lifetime = token_lifetime_from_env()?;
        Self::new(Secret::new(secret), &issuer, &audience, token_lifetime)
    }
}

fn token_lifetime_from_env() -> Result<Duration, ServerError> {
    let minutes = env::var("FDX_JWT_LIFETIME_MINUTES")
        .map_err(|_| {
            info!(
                "🪛️ FDX_JWT_LIFETIME_MINUTES is not set. Using the default value of {DEFAULT_TOKEN_LIFETIME_MINUTES} \
                 minutes."
            )
        })
        .and_then(|s| {
            s.trim().parse::<i64>().map_err(|e| warn!("🪛️ Invalid configuration value for FDX_JWT_LIFETIME_MINUTES. {e}"))
        })
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_MINUTES);
    Duration::try_minutes(minutes).ok_or_else(|| {
        ServerError::ConfigurationError(format!("FDX_JWT_LIFETIME_MINUTES is out of range ({minutes} minutes)."))
    })
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that is used to configure the server's behaviour. Generally we try to keep this
/// as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}
