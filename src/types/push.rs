use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::matches::MatchId;

#[derive(Debug, Clone)]
pub struct VapidConfig {
    pub private_key: String,
    pub public_key: String,
    pub subject: String,
}

/// Browser push endpoint plus the two client keys needed to encrypt for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

/// One device following one match. Unique on `(device_id, match_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub match_id: MatchId,
    pub device_id: String,
    #[serde(flatten)]
    pub subscription: Subscription,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Registration {
    pub fn new(match_id: MatchId, device_id: String, subscription: Subscription) -> Self {
        Self {
            match_id,
            device_id,
            subscription,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub url: String,
    pub match_id: MatchId,
}
