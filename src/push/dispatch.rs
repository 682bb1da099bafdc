use crate::ports::{DeliveryError, PushSender};
use crate::types::push::{NotificationPayload, Registration};

use futures::future::join_all;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Kept in the store; a later event may reach it.
    TransientFailure(String),
    /// Endpoint gone or registration unusable; safe to remove.
    PermanentFailure(String),
}

impl From<Result<(), DeliveryError>> for DeliveryOutcome {
    fn from(result: Result<(), DeliveryError>) -> Self {
        match result {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(DeliveryError::Permanent(reason)) => DeliveryOutcome::PermanentFailure(reason),
            Err(DeliveryError::Transient(reason)) => DeliveryOutcome::TransientFailure(reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub registration: Registration,
    pub outcome: DeliveryOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub attempts: Vec<DeliveryAttempt>,
}

impl DispatchReport {
    fn from_attempts(attempts: Vec<DeliveryAttempt>) -> Self {
        let sent = attempts
            .iter()
            .filter(|attempt| attempt.outcome == DeliveryOutcome::Delivered)
            .count();
        Self {
            sent,
            failed: attempts.len() - sent,
            attempts,
        }
    }

    /// Every registration counted as failed without an attempt being made.
    pub fn undeliverable(registrations: &[Registration]) -> Self {
        Self {
            sent: 0,
            failed: registrations.len(),
            attempts: Vec::new(),
        }
    }

    pub fn permanent_failures(&self) -> impl Iterator<Item = &Registration> {
        self.attempts.iter().filter_map(|attempt| match attempt.outcome {
            DeliveryOutcome::PermanentFailure(_) => Some(&attempt.registration),
            _ => None,
        })
    }
}

/// Fans one payload out to every registration of a match.
///
/// Deliveries run concurrently and are joined only once all of them have
/// finished; one failing or slow endpoint never cuts another attempt short.
#[derive(Debug, Clone)]
pub struct Dispatcher<S> {
    sender: S,
    timeout: Duration,
}

impl<S: PushSender> Dispatcher<S> {
    pub fn new(sender: S, timeout: Duration) -> Self {
        Self { sender, timeout }
    }

    pub async fn dispatch(
        &self,
        payload: &NotificationPayload,
        registrations: Vec<Registration>,
    ) -> DispatchReport {
        let message = match serde_json::to_string(payload) {
            Ok(message) => message,
            Err(err) => {
                tracing::error!(match_id = %payload.match_id, error = %err, "failed to encode push payload");
                return DispatchReport::undeliverable(&registrations);
            }
        };

        let deliveries = registrations
            .into_iter()
            .map(|registration| self.attempt(registration, &message));
        let report = DispatchReport::from_attempts(join_all(deliveries).await);

        tracing::info!(
            match_id = %payload.match_id,
            sent = report.sent,
            failed = report.failed,
            "push dispatch finished"
        );
        report
    }

    async fn attempt(&self, registration: Registration, message: &str) -> DeliveryAttempt {
        let delivery = self.sender.send(&registration.subscription, message);
        let outcome = match tokio::time::timeout(self.timeout, delivery).await {
            Ok(result) => DeliveryOutcome::from(result),
            Err(_) => DeliveryOutcome::TransientFailure(format!(
                "no response within {}ms",
                self.timeout.as_millis()
            )),
        };

        match &outcome {
            DeliveryOutcome::Delivered => {}
            DeliveryOutcome::TransientFailure(reason) => tracing::warn!(
                match_id = %registration.match_id,
                device_id = %registration.device_id,
                reason = %reason,
                "push delivery failed"
            ),
            DeliveryOutcome::PermanentFailure(reason) => tracing::info!(
                match_id = %registration.match_id,
                device_id = %registration.device_id,
                reason = %reason,
                "push subscription expired or invalid"
            ),
        }

        DeliveryAttempt {
            registration,
            outcome,
        }
    }
}
