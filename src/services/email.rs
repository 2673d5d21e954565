use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;

use crate::models::{Assignment, EmailDispatchResponse};

/// Errors that can occur when talking to the email API
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("email API returned error: {0}")]
    ApiError(String),

    #[error("email service is not configured")]
    NotConfigured,
}

/// Delay between messages to stay under the provider's rate limit
const SEND_DELAY: Duration = Duration::from_millis(500);

/// Client for an EmailJS-compatible template-send REST API
///
/// Sends each giver one templated message telling them who they drew,
/// including the recipient's wishlist and delivery address.
pub struct Mailer {
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
    client: Client,
}

impl Mailer {
    pub fn new(
        endpoint: String,
        service_id: String,
        template_id: String,
        public_key: String,
    ) -> Result<Self, EmailError> {
        if service_id.is_empty() || template_id.is_empty() || public_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            endpoint,
            service_id,
            template_id,
            public_key,
            client,
        })
    }

    async fn send_template(&self, params: serde_json::Value) -> Result<(), EmailError> {
        let body = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": params,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(EmailError::ApiError(format!("{}: {}", status, detail)));
        }

        Ok(())
    }

    /// Send one assignment notification to the giver
    pub async fn send_assignment(&self, assignment: &Assignment) -> Result<(), EmailError> {
        let params = json!({
            "to_name": assignment.giver_name,
            "to_email": assignment.giver_email,
            "recipient_name": assignment.recipient_name,
            "recipient_wishlist": assignment
                .recipient_wishlist
                .as_deref()
                .unwrap_or("No wishlist provided"),
            "recipient_address": assignment
                .recipient_address
                .as_deref()
                .unwrap_or("No address provided"),
        });

        self.send_template(params).await
    }

    /// Send the whole batch, pacing messages and collecting per-giver
    /// failures instead of aborting
    pub async fn send_all(&self, assignments: &[Assignment]) -> EmailDispatchResponse {
        let mut summary = EmailDispatchResponse {
            success: 0,
            failed: 0,
            errors: Vec::new(),
        };

        for (index, assignment) in assignments.iter().enumerate() {
            match self.send_assignment(assignment).await {
                Ok(()) => summary.success += 1,
                Err(e) => {
                    summary.failed += 1;
                    summary
                        .errors
                        .push(format!("Failed to send to {}: {}", assignment.giver_name, e));
                }
            }

            if index + 1 < assignments.len() {
                tokio::time::sleep(SEND_DELAY).await;
            }
        }

        summary
    }

    /// Send a fixed-content message to verify the template configuration
    pub async fn send_test(&self, email: &str, name: &str) -> Result<(), EmailError> {
        let params = json!({
            "to_name": name,
            "to_email": email,
            "recipient_name": "Test Recipient (Santa Claus)",
            "recipient_wishlist": "This is a test wishlist:\n- A new sleigh\n- More cookies\n- Extra milk",
            "recipient_address": "123 North Pole Lane\nArctic Circle\nH0H 0H0",
        });

        self.send_template(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credentials_rejected() {
        let result = Mailer::new(
            "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            String::new(),
            "template".to_string(),
            "key".to_string(),
        );
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[test]
    fn test_configured_mailer_builds() {
        let result = Mailer::new(
            "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            "service".to_string(),
            "template".to_string(),
            "key".to_string(),
        );
        assert!(result.is_ok());
    }
}
