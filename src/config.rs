use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_NOTIFY_ROLES: [&str; 2] = ["admin", "editor"];

#[derive(Clone)]
pub struct AppConfig {
    pub app_name: String,
    /// TOML file holding subscriber registrations; memory only when unset.
    pub store_path: Option<PathBuf>,
    pub vapid_private_key: Option<String>,
    pub vapid_public_key: Option<String>,
    pub vapid_subject: Option<String>,
    pub auth: Option<AuthConfig>,
    pub delivery_timeout: Duration,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub key: String,
    pub token_ttl: time::Duration,
    pub cookie_name: String,
    pub allowed_roles: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Livescore".to_string(),
            store_path: None,
            vapid_private_key: None,
            vapid_public_key: None,
            vapid_subject: None,
            auth: None,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }
}
