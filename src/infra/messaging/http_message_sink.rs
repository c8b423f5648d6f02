use crate::domain::ports::MessageSink;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

/// Hands notification texts to an external delivery gateway. Delivery is
/// fire-and-forget from the core's perspective; callers log failures and
/// move on.
pub struct HttpMessageSink {
    client: Client,
    api_url: String,
    api_token: String,
}

impl HttpMessageSink {
    pub fn new(api_url: String, api_token: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_token,
        }
    }
}

#[derive(Serialize)]
struct MessagePayload {
    to: String,
    body: String,
}

#[async_trait]
impl MessageSink for HttpMessageSink {
    async fn send(&self, phone: &str, body: &str) -> Result<(), AppError> {
        let payload = MessagePayload {
            to: phone.to_string(),
            body: body.to_string(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Message gateway connection error: {}", e);
                error!("{}", msg);
                AppError::Upstream(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Message gateway failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Upstream(msg));
        }

        Ok(())
    }
}
