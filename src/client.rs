use std::future::Future;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ChatError, Result};
use crate::types::{
    ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, MessageList, MessageRequest,
    Thread, ThreadMessage, ThreadRequest,
};

/// Page size requested when listing thread messages (service maximum).
pub const MESSAGE_PAGE_LIMIT: u32 = 100;

/// The four remote calls a conversation needs.
///
/// `OpenAiClient` talks to the real service; tests substitute an in-memory
/// implementation.
pub trait AssistantApi {
    fn create_thread(&self, request: &ThreadRequest) -> impl Future<Output = Result<Thread>>;

    /// One page of messages, newest first. `after` is the cursor returned as
    /// `last_id` by the previous page.
    fn list_messages(
        &self,
        thread_id: &str,
        after: Option<&str>,
    ) -> impl Future<Output = Result<MessageList>>;

    fn create_message(
        &self,
        thread_id: &str,
        request: &MessageRequest,
    ) -> impl Future<Output = Result<ThreadMessage>>;

    fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> impl Future<Output = Result<ChatCompletionResponse>>;
}

pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// `base_url` must already be validated and have no trailing slash.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Assistants endpoints (threads, messages) are gated behind a beta header.
    fn assistants(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = builder.send().await.map_err(|source| ChatError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ChatError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        debug!(endpoint, status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(err) => err.error.message,
                Err(_) => body,
            };
            return Err(ChatError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| ChatError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

impl AssistantApi for OpenAiClient {
    async fn create_thread(&self, request: &ThreadRequest) -> Result<Thread> {
        let builder = self.assistants(self.http.post(self.url("threads"))).json(request);
        self.send("threads", builder).await
    }

    async fn list_messages(&self, thread_id: &str, after: Option<&str>) -> Result<MessageList> {
        let path = format!("threads/{}/messages", thread_id);
        let mut builder = self
            .assistants(self.http.get(self.url(&path)))
            .query(&[("limit", MESSAGE_PAGE_LIMIT.to_string())]);
        if let Some(cursor) = after {
            builder = builder.query(&[("after", cursor)]);
        }
        self.send(&path, builder).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: &MessageRequest,
    ) -> Result<ThreadMessage> {
        let path = format!("threads/{}/messages", thread_id);
        let builder = self.assistants(self.http.post(self.url(&path))).json(request);
        self.send(&path, builder).await
    }

    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let builder = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(request);
        self.send("chat/completions", builder).await
    }
}
