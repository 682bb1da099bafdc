use crate::types::matches::MatchId;
use crate::types::push::Registration;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("registration store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("registration store is unreadable: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("registration store could not be encoded: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Persistence for subscriber registrations, keyed by `(device_id, match_id)`.
pub trait RegistrationStore: Send + Sync + 'static {
    fn list(&self, match_id: &MatchId) -> Result<Vec<Registration>, StoreError>;

    fn find(&self, match_id: &MatchId, device_id: &str)
    -> Result<Option<Registration>, StoreError>;

    /// Inserts or replaces the registration for the same device and match.
    fn upsert(&self, registration: Registration) -> Result<(), StoreError>;

    /// Returns whether a registration was removed.
    fn remove(&self, match_id: &MatchId, device_id: &str) -> Result<bool, StoreError>;

    /// Removes every registration of the match that points at `endpoint`.
    fn remove_endpoint(&self, match_id: &MatchId, endpoint: &str) -> Result<usize, StoreError>;
}
