//! HTTP decision provider.
//!
//! Posts `{"messages": [system, user]}` to a chat-completion style endpoint
//! and reads the model's text from `{"result": "..."}`.

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::delegated::{DecisionError, DecisionProvider};

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    messages: [Message<'a>; 2],
}

#[derive(Deserialize)]
struct CompletionResponse {
    result: String,
}

pub struct HttpDecisionProvider {
    http_client: Client,
    endpoint: String,
    bearer_token: Option<String>,
}

impl HttpDecisionProvider {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: endpoint.into(),
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl DecisionProvider for HttpDecisionProvider {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, DecisionError>> {
        Box::pin(async move {
            let body = CompletionRequest {
                messages: [
                    Message {
                        role: "system",
                        content: system,
                    },
                    Message {
                        role: "user",
                        content: prompt,
                    },
                ],
            };
            let mut request = self.http_client.post(&self.endpoint).json(&body);
            if let Some(token) = &self.bearer_token {
                request = request.bearer_auth(token);
            }
            let response = request.send().await?;

            match response.status() {
                StatusCode::OK => {
                    let completion: CompletionResponse = response.json().await?;
                    Ok(completion.result)
                }
                status => Err(DecisionError::Provider(format!("endpoint returned {status}"))),
            }
        })
    }
}
