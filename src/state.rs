use crate::auth::AuthState;
use crate::config::AppConfig;
use crate::ports::RegistrationStore;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub(crate) auth: Option<AuthState>,
    pub store: Arc<dyn RegistrationStore>,
}
