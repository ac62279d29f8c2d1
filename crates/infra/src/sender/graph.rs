//! Messenger Send API client (Graph API `me/messages`).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{MessageSender, SendOutcome};

/// Sends page messages through the Graph API.
///
/// The credential is a page access token and travels as the `access_token`
/// query parameter, so request URLs are stripped from every error message.
#[derive(Debug, Clone)]
pub struct GraphApiSender {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphApiSender {
    /// Build a sender against `base_url` (e.g. `https://graph.facebook.com/v17.0`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/me/messages", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MessageSender for GraphApiSender {
    async fn send(&self, credential: &str, recipient: &str, text: &str) -> SendOutcome {
        let payload = json!({
            "recipient": { "id": recipient },
            "message": { "text": text },
        });

        let resp = match self
            .client
            .post(&self.endpoint)
            .query(&[("access_token", credential)])
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return SendOutcome::error(e.without_url().to_string()),
        };

        let status = resp.status();
        let raw = match resp.text().await {
            Ok(t) => t,
            Err(e) => return SendOutcome::error(e.without_url().to_string()),
        };

        let body = if raw.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(&raw) {
                Ok(v) => v,
                Err(e) => {
                    return SendOutcome::error(format!(
                        "undecodable response body (status {}): {e}",
                        status.as_u16()
                    ));
                }
            }
        };

        debug!(status = status.as_u16(), "graph api responded");

        SendOutcome::Response {
            succeeded: status.is_success(),
            status_code: status.as_u16(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{extract::Query, http::StatusCode, routing::post, Json, Router};

    use super::*;

    type Captured = Arc<Mutex<Vec<(HashMap<String, String>, serde_json::Value)>>>;

    async fn spawn_fake_graph(status: StatusCode, reply: &'static str) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();

        let app = Router::new().route(
            "/me/messages",
            post(
                move |Query(q): Query<HashMap<String, String>>, Json(body): Json<serde_json::Value>| {
                    let sink = sink.clone();
                    async move {
                        sink.lock().unwrap().push((q, body));
                        (status, reply)
                    }
                },
            ),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), captured)
    }

    #[tokio::test]
    async fn posts_payload_and_token() {
        let (base, captured) =
            spawn_fake_graph(StatusCode::OK, r#"{"recipient_id":"r1","message_id":"m1"}"#).await;
        let sender = GraphApiSender::new(&base, Duration::from_secs(5)).unwrap();

        let outcome = sender.send("page-token", "r1", "hello there").await;

        assert_eq!(
            outcome,
            SendOutcome::Response {
                succeeded: true,
                status_code: 200,
                body: json!({"recipient_id": "r1", "message_id": "m1"}),
            }
        );

        let calls = captured.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.get("access_token").map(String::as_str), Some("page-token"));
        assert_eq!(calls[0].1["recipient"]["id"], "r1");
        assert_eq!(calls[0].1["message"]["text"], "hello there");
    }

    #[tokio::test]
    async fn rejected_request_is_recorded_not_raised() {
        let (base, _) =
            spawn_fake_graph(StatusCode::BAD_REQUEST, r#"{"error":{"message":"Invalid OAuth access token."}}"#)
                .await;
        let sender = GraphApiSender::new(&base, Duration::from_secs(5)).unwrap();

        let outcome = sender.send("bad", "r1", "hi").await;
        match outcome {
            SendOutcome::Response { succeeded, status_code, body } => {
                assert!(!succeeded);
                assert_eq!(status_code, 400);
                assert_eq!(body["error"]["message"], "Invalid OAuth access token.");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_body_becomes_empty_object() {
        let (base, _) = spawn_fake_graph(StatusCode::OK, "").await;
        let sender = GraphApiSender::new(&base, Duration::from_secs(5)).unwrap();

        let outcome = sender.send("t", "r", "x").await;
        assert_eq!(
            outcome,
            SendOutcome::Response { succeeded: true, status_code: 200, body: json!({}) }
        );
    }

    #[tokio::test]
    async fn non_json_body_is_an_error_outcome() {
        let (base, _) = spawn_fake_graph(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").await;
        let sender = GraphApiSender::new(&base, Duration::from_secs(5)).unwrap();

        match sender.send("t", "r", "x").await {
            SendOutcome::Error { message } => assert!(message.contains("502")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_token() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sender = GraphApiSender::new(&format!("http://{addr}/"), Duration::from_secs(2)).unwrap();
        assert_eq!(sender.endpoint(), format!("http://{addr}/me/messages"));

        match sender.send("super-secret-token", "r", "x").await {
            SendOutcome::Error { message } => assert!(!message.contains("super-secret-token")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
