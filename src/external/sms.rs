use std::time::Duration;

use derive_more::Display;
use reqwest::Client;
use serde::Serialize;

/// Non-fatal by policy: callers log the failure and fall back to showing the
/// code on screen instead of blocking the reset flow.
#[derive(Debug, Display)]
#[display(fmt = "SMS delivery failed: {}", _0)]
pub struct DeliveryFailure(String);

impl std::error::Error for DeliveryFailure {}

#[derive(Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    message: String,
}

/// Fire-and-forget SMS channel for one-time codes.
#[derive(Clone)]
pub struct SmsChannel {
    client: Client,
    gateway_url: Option<String>,
}

impl SmsChannel {
    pub fn new(gateway_url: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            gateway_url,
        }
    }

    pub async fn send_code(
        &self,
        destination: &str,
        code: &str,
        reason: &str,
    ) -> Result<(), DeliveryFailure> {
        let Some(url) = &self.gateway_url else {
            return Err(DeliveryFailure("no SMS gateway configured".to_string()));
        };

        let payload = SmsPayload {
            to: destination,
            message: format!("{}: your one-time code is {}", reason, code),
        };

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryFailure(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn missing_gateway_is_a_delivery_failure() {
        let channel = SmsChannel::new(None);
        let result = channel.send_code("9978815870", "123456", "Password reset").await;
        assert!(result.is_err());
    }
}
