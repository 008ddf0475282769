use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки LLM провайдера
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Роль сообщения в чате
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Сообщение чата
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<contracts::domain::a001_log_analysis::ChatMessage> for ChatMessage {
    fn from(msg: contracts::domain::a001_log_analysis::ChatMessage) -> Self {
        use contracts::domain::a001_log_analysis::ChatRole as WireRole;
        let role = match msg.role {
            WireRole::System => ChatRole::System,
            WireRole::User => ChatRole::User,
            WireRole::Assistant => ChatRole::Assistant,
        };
        Self {
            role,
            content: msg.content,
        }
    }
}

/// Параметры генерации
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Ответ от LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub tokens_used: Option<i32>,
    pub model: String,
    pub finish_reason: Option<String>,
}

/// Поток фрагментов текста ответа
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// Трейт для LLM провайдеров
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Один запрос к чату с указанной моделью
    async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<LlmResponse, LlmError>;

    /// Потоковый запрос: ошибка возвращается, если модель не приняла запрос
    async fn chat_completion_stream(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<TextStream, LlmError>;

    /// Получить название провайдера
    fn provider_name(&self) -> &str;
}
