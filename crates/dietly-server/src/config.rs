//! Server configuration, loaded from `DIETLY_*` environment variables.

use std::env;
use std::net::SocketAddr;

use dietly_auth::AuthConfig;
use dietly_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// SuperAdmin account created on first boot of a fresh install. Only
/// applied when no user with the configured username exists yet.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::Missing(var))
}

fn var_or(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = var_or("DIETLY_BIND_ADDR", "0.0.0.0:3000")
            .parse()
            .map_err(|e| ConfigError::Invalid {
                var: "DIETLY_BIND_ADDR",
                message: format!("{e}"),
            })?;

        let mut db = DbConfig::default();
        if let Ok(endpoint) = env::var("DIETLY_DB_ENDPOINT") {
            db.endpoint = endpoint;
        }
        if let Ok(namespace) = env::var("DIETLY_DB_NAMESPACE") {
            db.namespace = namespace;
        }
        if let Ok(database) = env::var("DIETLY_DB_DATABASE") {
            db.database = database;
        }
        if let Ok(username) = env::var("DIETLY_DB_USERNAME") {
            db.username = Some(username);
        }
        if let Ok(password) = env::var("DIETLY_DB_PASSWORD") {
            db.password = Some(password);
        }

        let access_token_lifetime_secs = match env::var("DIETLY_TOKEN_LIFETIME_SECS") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                var: "DIETLY_TOKEN_LIFETIME_SECS",
                message: format!("{e}"),
            })?,
            Err(_) => AuthConfig::default().access_token_lifetime_secs,
        };

        // The key pair has no sensible default — a deployment without
        // its own keys would accept another deployment's tokens.
        let auth = AuthConfig {
            jwt_private_key_pem: require("DIETLY_JWT_PRIVATE_KEY_PEM")?,
            jwt_public_key_pem: require("DIETLY_JWT_PUBLIC_KEY_PEM")?,
            access_token_lifetime_secs,
            jwt_issuer: var_or("DIETLY_JWT_ISSUER", "dietly"),
            pepper: env::var("DIETLY_PASSWORD_PEPPER").ok(),
        };

        let bootstrap_admin = match (
            env::var("DIETLY_BOOTSTRAP_ADMIN_USERNAME"),
            env::var("DIETLY_BOOTSTRAP_ADMIN_PASSWORD"),
            env::var("DIETLY_BOOTSTRAP_ADMIN_EMAIL"),
        ) {
            (Ok(username), Ok(password), Ok(email)) => Some(BootstrapAdmin {
                name: var_or("DIETLY_BOOTSTRAP_ADMIN_NAME", "Platform Admin"),
                email,
                username,
                password,
            }),
            (Err(_), Err(_), Err(_)) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    var: "DIETLY_BOOTSTRAP_ADMIN_USERNAME",
                    message: "bootstrap admin requires username, password, and email together"
                        .into(),
                });
            }
        };

        Ok(Self {
            bind_addr,
            db,
            auth,
            bootstrap_admin,
        })
    }
}
