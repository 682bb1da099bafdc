use crate::adapters::WebPushSender;
use crate::config;
use crate::types::push::{NotificationPayload, Registration};

mod dispatch;
pub mod payload;
pub(crate) mod vapid;

pub use dispatch::{DeliveryAttempt, DeliveryOutcome, DispatchReport, Dispatcher};
pub use payload::{MatchUpdate, build_payload};
pub use vapid::{VapidCredentials, generate_vapid_credentials};
pub(crate) use vapid::{VapidConfigStatus, load_vapid_config};

#[cfg(test)]
pub(crate) use dispatch::tests as dispatch_tests;

/// Sends `payload` to `registrations` with the configured VAPID keys.
///
/// Missing or unusable signing configuration turns the whole dispatch into a
/// no-op that reports every registration as failed.
pub async fn dispatch_with_config(
    config: &config::AppConfig,
    payload: &NotificationPayload,
    registrations: Vec<Registration>,
) -> DispatchReport {
    let vapid = match load_vapid_config(config) {
        VapidConfigStatus::Ready(vapid) => vapid,
        VapidConfigStatus::Incomplete => {
            tracing::error!(
                match_id = %payload.match_id,
                "push notifications disabled: incomplete VAPID configuration"
            );
            return DispatchReport::undeliverable(&registrations);
        }
        VapidConfigStatus::Missing => {
            tracing::error!(
                match_id = %payload.match_id,
                "push notifications disabled: VAPID keys are not configured"
            );
            return DispatchReport::undeliverable(&registrations);
        }
    };

    let sender = match WebPushSender::new(vapid) {
        Ok(sender) => sender,
        Err(err) => {
            tracing::error!(
                match_id = %payload.match_id,
                error = %err,
                "push notifications disabled: failed to init web-push"
            );
            return DispatchReport::undeliverable(&registrations);
        }
    };

    Dispatcher::new(sender, config.delivery_timeout)
        .dispatch(payload, registrations)
        .await
}
