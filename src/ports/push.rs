use crate::types::push::Subscription;

/// Outcome class of a failed delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The push service rejected the endpoint for good (gone, unknown, or
    /// the registration itself is malformed). The registration can be removed.
    #[error("permanent delivery failure: {0}")]
    Permanent(String),
    /// Anything else: network trouble, throttling, server errors, timeouts.
    #[error("transient delivery failure: {0}")]
    Transient(String),
}

impl DeliveryError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, DeliveryError::Permanent(_))
    }
}

pub trait PushSender: Clone + Send + Sync + 'static {
    type Fut<'a>: Future<Output = Result<(), DeliveryError>> + Send + 'a
    where
        Self: 'a;

    fn send<'a>(&'a self, subscription: &'a Subscription, message: &'a str) -> Self::Fut<'a>;
}
