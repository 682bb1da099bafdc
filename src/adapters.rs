use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;

use crate::ports;
use crate::ports::DeliveryError;
use crate::types::push::{Subscription, VapidConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimeProvider;

impl ports::TimeProvider for TokioTimeProvider {
    type Sleep<'a>
        = tokio::time::Sleep
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        tokio::time::sleep(duration)
    }
}

#[derive(Clone)]
pub struct WebPushSender {
    vapid: VapidConfig,
    client: Arc<web_push::WebPushClient>,
}

impl WebPushSender {
    /// Fails when the client cannot be built or the private key does not
    /// decode, so later key errors can be blamed on the subscription.
    pub fn new(vapid: VapidConfig) -> Result<Self, web_push::WebPushError> {
        web_push::VapidSignatureBuilder::from_base64_no_sub(
            &vapid.private_key,
            web_push::URL_SAFE_NO_PAD,
        )?;
        let client = web_push::WebPushClient::new()?;
        Ok(Self {
            vapid,
            client: Arc::new(client),
        })
    }

    async fn deliver(
        &self,
        subscription: &Subscription,
        message: &str,
    ) -> Result<(), web_push::WebPushError> {
        let subscription_info = web_push::SubscriptionInfo::new(
            subscription.endpoint.clone(),
            subscription.p256dh.clone(),
            subscription.auth.clone(),
        );
        let mut builder = web_push::WebPushMessageBuilder::new(&subscription_info)?;
        builder.set_payload(web_push::ContentEncoding::Aes128Gcm, message.as_bytes());
        let mut signature_builder = web_push::VapidSignatureBuilder::from_base64(
            &self.vapid.private_key,
            web_push::URL_SAFE_NO_PAD,
            &subscription_info,
        )?;
        signature_builder.add_claim("sub", self.vapid.subject.as_str());
        builder.set_vapid_signature(signature_builder.build()?);
        self.client.send(builder.build()?).await
    }
}

impl ports::PushSender for WebPushSender {
    type Fut<'a>
        = Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>
    where
        Self: 'a;

    fn send<'a>(&'a self, subscription: &'a Subscription, message: &'a str) -> Self::Fut<'a> {
        Box::pin(async move {
            self.deliver(subscription, message)
                .await
                .map_err(|err| classify_web_push_error(&err))
        })
    }
}

/// 404/410 from the push service and registrations whose endpoint or keys
/// cannot be used at all are permanent; the rest may succeed on a later event.
pub(crate) fn classify_web_push_error(err: &web_push::WebPushError) -> DeliveryError {
    use web_push::WebPushError;

    let message = err.to_string();
    match err {
        WebPushError::EndpointNotValid
        | WebPushError::EndpointNotFound
        | WebPushError::InvalidUri
        | WebPushError::InvalidCryptoKeys
        | WebPushError::MissingCryptoKeys => DeliveryError::Permanent(message),
        _ => DeliveryError::Transient(message),
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::scoreboard::{BadgeBoard, BadgeKind};
    use crate::types::matches::MatchId;

    #[test]
    fn classify_web_push_error__should_mark_gone_endpoints_permanent() {
        // Then
        assert!(
            classify_web_push_error(&web_push::WebPushError::EndpointNotValid).is_permanent()
        );
        assert!(
            classify_web_push_error(&web_push::WebPushError::EndpointNotFound).is_permanent()
        );
        assert!(classify_web_push_error(&web_push::WebPushError::InvalidUri).is_permanent());
        assert!(
            classify_web_push_error(&web_push::WebPushError::InvalidCryptoKeys).is_permanent()
        );
    }

    #[test]
    fn classify_web_push_error__should_keep_other_failures_transient() {
        // Then
        assert!(
            !classify_web_push_error(&web_push::WebPushError::PayloadTooLarge).is_permanent()
        );
        assert!(!classify_web_push_error(&web_push::WebPushError::Unspecified).is_permanent());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_time_provider__should_clear_badge_after_duration() {
        // Given
        let board = BadgeBoard::new(TokioTimeProvider);
        let match_id = MatchId::new("42");
        board.raise(match_id.clone(), BadgeKind::Reset);
        tokio::task::yield_now().await;

        // When
        tokio::time::advance(Duration::from_secs(2)).await;
        let midway = board.active(&match_id);
        tokio::time::advance(Duration::from_secs(2)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        // Then
        assert_eq!(midway.expect("badge midway").label, "RESET");
        assert_eq!(board.active(&match_id), None);
    }
}
