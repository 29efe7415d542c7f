use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Assistant => write!(f, "Assistant"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// One entry of a thread's `content` array. Only text parts matter here;
/// images and anything newer fall into `Other`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextValue },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TextValue {
    pub value: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThreadMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    pub fn new(id: String, role: Role, text: String) -> Self {
        Self {
            id,
            role,
            content: vec![MessageContent::Text {
                text: TextValue { value: text },
            }],
        }
    }

    /// Concatenated text parts, or `None` when the message carries no text.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text { text } => Some(text.value.as_str()),
                MessageContent::Other => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}

/// One page of `GET /threads/{id}/messages`, newest first.
#[derive(Deserialize, Debug, Clone)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct MessageRequest {
    pub role: Role,
    pub content: String,
}

impl MessageRequest {
    pub fn new(role: Role, content: String) -> Self {
        Self { role, content }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ThreadRequest {
    pub messages: Vec<MessageRequest>,
    pub metadata: HashMap<String, String>,
}

impl ThreadRequest {
    /// A chatbot thread seeded with the user's first question.
    pub fn chatbot(initial_message: String) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("conversation_type".to_string(), "chatbot".to_string());
        Self {
            messages: vec![MessageRequest::new(Role::User, initial_message)],
            metadata,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: String) -> Self {
        Self { role, content }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    pub fn new(model: String) -> Self {
        Self {
            model,
            messages: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub message: CompletionMessage,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
    // set instead of `content` when the model declines
    #[serde(default)]
    pub refusal: Option<String>,
}

impl CompletionMessage {
    /// The text to show and save: the content, or the refusal when the
    /// content is missing or blank.
    pub fn into_reply(self) -> Option<String> {
        self.content
            .filter(|text| !text.trim().is_empty())
            .or(self.refusal.filter(|text| !text.trim().is_empty()))
    }
}

/// Error envelope the service returns alongside non-2xx statuses.
#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub message: String,
}
