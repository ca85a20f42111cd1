use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::bypass::DEFAULT_BYPASS_ROUTES;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub authz: AuthzConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    SingleUser,
    Proxy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub proxy: Option<ProxyAuthConfig>,
    pub single_user: Option<SingleUserAuthConfig>,
}

/// Upstream authenticating proxy settings.
///
/// The proxy is trusted to have verified credentials; the header value is
/// taken as the opaque identity as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyAuthConfig {
    #[serde(default = "default_identity_header")]
    pub header: String,
}

impl Default for ProxyAuthConfig {
    fn default() -> Self {
        Self {
            header: default_identity_header(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleUserAuthConfig {
    pub identity: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthzConfig {
    /// Fallback for the enforcement kill-switch when the environment variable is unset.
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_disabled_env_var")]
    pub disabled_env_var: String,
    #[serde(default = "default_bypass_routes")]
    pub bypass_routes: Vec<String>,
    #[serde(default)]
    pub super_admin: SuperAdminConfig,
    #[serde(default)]
    pub super_user: SuperUserConfig,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            disabled_env_var: default_disabled_env_var(),
            bypass_routes: default_bypass_routes(),
            super_admin: SuperAdminConfig::default(),
            super_user: SuperUserConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuperAdminConfig {
    /// Accepted `role_type` spellings, compared trimmed and case-insensitively.
    #[serde(default = "default_super_admin_role_types")]
    pub role_types: Vec<String>,
    /// A single contact address that is always treated as Super Admin.
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for SuperAdminConfig {
    fn default() -> Self {
        Self {
            role_types: default_super_admin_role_types(),
            email: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuperUserConfig {
    #[serde(default = "default_super_user_username")]
    pub username: String,
}

impl Default for SuperUserConfig {
    fn default() -> Self {
        Self {
            username: default_super_user_username(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_identity_header() -> String {
    "x-authenticated-user".to_string()
}

fn default_disabled_env_var() -> String {
    "CASEGUARD_AUTHZ_DISABLED".to_string()
}

fn default_bypass_routes() -> Vec<String> {
    DEFAULT_BYPASS_ROUTES
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_super_admin_role_types() -> Vec<String> {
    vec!["Super Admin".to_string(), "Supper Admin".to_string()]
}

fn default_super_user_username() -> String {
    "admin".to_string()
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "info")?
            .set_default("auth.method", "proxy")?
            .set_default("authz.disabled", false)?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
