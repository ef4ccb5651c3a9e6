use crate::core::Notifier;
use crate::utils::error::{MonitorError, Result};
use reqwest::Client;
use serde::Serialize;

pub const MAILJET_API_BASE: &str = "https://api.mailjet.com";
pub const DEFAULT_SENDER_NAME: &str = "Visa Monitor";

/// Mailjet v3.1 send API payload. Field names on the wire are PascalCase.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendRequest {
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Message {
    from: Address,
    to: Vec<Address>,
    subject: String,
    text_part: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Address {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Sends alerts through `POST /v3.1/send` with basic auth (public key as
/// the username, private key as the password).
#[derive(Debug, Clone)]
pub struct MailjetNotifier {
    client: Client,
    api_base: String,
    public_key: String,
    private_key: String,
    from_email: String,
    sender_name: String,
    recipient_email: String,
}

impl MailjetNotifier {
    pub fn new(
        public_key: impl Into<String>,
        private_key: impl Into<String>,
        from_email: impl Into<String>,
        recipient_email: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: MAILJET_API_BASE.to_string(),
            public_key: public_key.into(),
            private_key: private_key.into(),
            from_email: from_email.into(),
            sender_name: DEFAULT_SENDER_NAME.to_string(),
            recipient_email: recipient_email.into(),
        }
    }

    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = name.into();
        self
    }

    /// Point at a different API host. Tests use this for a mock server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
}

#[async_trait::async_trait]
impl Notifier for MailjetNotifier {
    async fn send(&self, subject: &str, text: &str) -> Result<()> {
        let payload = SendRequest {
            messages: vec![Message {
                from: Address {
                    email: self.from_email.clone(),
                    name: Some(self.sender_name.clone()),
                },
                to: vec![Address {
                    email: self.recipient_email.clone(),
                    name: None,
                }],
                subject: subject.to_string(),
                text_part: text.to_string(),
            }],
        };

        let url = format!("{}/v3.1/send", self.api_base);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.public_key, Some(&self.private_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(MonitorError::MailSendError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Mailjet send status: {}", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn notifier(server: &MockServer) -> MailjetNotifier {
        MailjetNotifier::new(
            "public-key",
            "private-key",
            "alerts@example.com",
            "me@example.com",
        )
        .with_api_base(server.base_url())
    }

    #[tokio::test]
    async fn test_send_posts_v31_payload() {
        let server = MockServer::start();
        let send_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v3.1/send")
                .header_exists("authorization")
                .json_body_partial(
                    r#"{
                        "Messages": [{
                            "From": {"Email": "alerts@example.com", "Name": "Visa Monitor"},
                            "To": [{"Email": "me@example.com"}],
                            "Subject": "subject line",
                            "TextPart": "body text"
                        }]
                    }"#,
                );
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"Messages": [{"Status": "success"}]}));
        });

        notifier(&server)
            .send("subject line", "body text")
            .await
            .unwrap();

        send_mock.assert();
    }

    #[tokio::test]
    async fn test_send_uses_configured_sender_name() {
        let server = MockServer::start();
        let send_mock = server.mock(|when, then| {
            when.method(POST).path("/v3.1/send").json_body_partial(
                r#"{"Messages": [{"From": {"Name": "Consulate Watch"}}]}"#,
            );
            then.status(200);
        });

        notifier(&server)
            .with_sender_name("Consulate Watch")
            .send("s", "t")
            .await
            .unwrap();

        send_mock.assert();
    }

    #[tokio::test]
    async fn test_send_failure_carries_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v3.1/send");
            then.status(401).body("bad credentials");
        });

        let err = notifier(&server).send("s", "t").await.unwrap_err();

        match err {
            MonitorError::MailSendError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad credentials");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
