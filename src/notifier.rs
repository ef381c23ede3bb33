use anyhow::Result;
use log::{error, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Body of the Bot API sendMessage call, form-encoded like the endpoint
/// expects.
#[derive(Debug, Serialize)]
struct SendMessageForm<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Performs the single outbound call per send attempt.
pub struct Notifier {
    client: Client,
    base_url: String,
}

impl Notifier {
    pub fn new() -> Result<Self> {
        Self::with_base_url(TELEGRAM_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// One attempt, no retries. Every attempt leaves exactly one log line;
    /// anything other than HTTP 200 counts as failure.
    pub fn send(&self, token: &str, chat_id: &str, text: &str) -> bool {
        let url = format!("{}/bot{}/sendMessage", self.base_url, token);
        let form = SendMessageForm {
            chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        match self.client.post(&url).form(&form).send() {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::OK {
                    info!("Message sent successfully.");
                    true
                } else {
                    let body = response.text().unwrap_or_default();
                    error!(
                        "Failed to send message. Status {}, Response: {}",
                        status.as_u16(),
                        body
                    );
                    false
                }
            }
            Err(e) => {
                error!("Exception sending message: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn notifier(server: &MockServer) -> Notifier {
        Notifier::with_base_url(server.base_url()).unwrap()
    }

    #[test]
    fn test_send_success_on_200() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/bottest-token/sendMessage");
            then.status(200).body(r#"{"ok":true}"#);
        });

        assert!(notifier(&server).send("test-token", "12345", "Hello"));
        mock.assert_calls(1);
    }

    #[test]
    fn test_send_carries_payload_fields() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/bottest-token/sendMessage")
                .matches(|req| {
                    let body = String::from_utf8_lossy(req.body().as_ref()).to_string();
                    body.contains("chat_id=12345")
                        && body.contains("text=Hello")
                        && body.contains("parse_mode=HTML")
                        && body.contains("disable_web_page_preview=true")
                });
            then.status(200).body(r#"{"ok":true}"#);
        });

        assert!(notifier(&server).send("test-token", "12345", "Hello"));
        mock.assert_calls(1);
    }

    #[test]
    fn test_send_failure_on_400() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/bottest-token/sendMessage");
            then.status(400)
                .body(r#"{"ok":false,"description":"Bad Request: chat not found"}"#);
        });

        assert!(!notifier(&server).send("test-token", "12345", "Hello"));
        mock.assert_calls(1);
    }

    #[test]
    fn test_send_failure_on_500() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/bottest-token/sendMessage");
            then.status(500).body("internal error");
        });

        assert!(!notifier(&server).send("test-token", "12345", "Hello"));
    }

    #[test]
    fn test_send_failure_on_transport_error() {
        // Nothing listens on port 1, the connection is refused
        let notifier = Notifier::with_base_url("http://127.0.0.1:1").unwrap();
        assert!(!notifier.send("test-token", "12345", "Hello"));
    }
}
