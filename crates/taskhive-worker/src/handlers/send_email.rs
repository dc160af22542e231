//! Sends a transactional email via the Brevo API. Credentials are carried
//! opaquely through [`taskhive_shared::config::BrevoConfig`]; the core never
//! reads these fields itself.

use async_trait::async_trait;
use serde::Deserialize;
use taskhive_shared::config::BrevoConfig;
use taskhive_shared::task::InternalTask;

use crate::dispatcher::TaskHandler;

#[derive(Debug, Deserialize)]
struct EmailPayload {
    client_name: String,
    client_email: String,
    recipient_name: String,
    recipient_email: String,
    subject: String,
    html_content: String,
}

pub struct SendEmailHandler {
    config: BrevoConfig,
    client: reqwest::Client,
}

impl SendEmailHandler {
    pub fn new(config: BrevoConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TaskHandler for SendEmailHandler {
    async fn handle(&self, task: &InternalTask) -> anyhow::Result<()> {
        let payload: EmailPayload = serde_json::from_value(task.task.payload.clone())?;

        let url = self
            .config
            .url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("BREVO_URL is not configured"))?;
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("BREVO_API_KEY is not configured"))?;
        let sender_email = self
            .config
            .email
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("BREVO_EMAIL is not configured"))?;

        let body = serde_json::json!({
            "sender": { "name": "taskhive", "email": sender_email },
            "to": [{ "email": payload.recipient_email, "name": payload.recipient_name }],
            "replyTo": { "name": payload.client_name, "email": payload.client_email },
            "subject": payload.subject,
            "htmlContent": payload.html_content,
        });

        let response = self
            .client
            .post(url)
            .header("accept", "application/json")
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().as_u16() >= 300 {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("email send failed: status {status}, body: {text}");
        }

        tracing::debug!(status = %response.status(), "email sent");
        Ok(())
    }
}
