use super::types::{
    ChatMessage, ChatRole, GenerationParams, LlmError, LlmProvider, LlmResponse, TextStream,
};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::StreamExt;

/// Провайдер для OpenAI-совместимых API (OpenAI, Groq, OpenRouter, ...)
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiProvider {
    /// Создать с кастомным endpoint (для совместимых API)
    pub fn new_with_endpoint(api_endpoint: &str, api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_endpoint);

        Self {
            client: Client::with_config(config),
        }
    }

    /// Конвертировать наши сообщения в формат OpenAI
    fn convert_messages(
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        messages
            .into_iter()
            .map(|msg| {
                let converted: ChatCompletionRequestMessage = match msg.role {
                    ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                        .content(msg.content)
                        .build()
                        .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                        .into(),
                    ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                        .content(msg.content)
                        .build()
                        .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                        .into(),
                    ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                        .content(msg.content)
                        .build()
                        .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                        .into(),
                };
                Ok(converted)
            })
            .collect()
    }

    fn build_request(
        model: &str,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
        stream: bool,
    ) -> Result<CreateChatCompletionRequest, LlmError> {
        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(model)
            .messages(Self::convert_messages(messages)?)
            .stream(stream);

        if Self::supports_advanced_params(model) {
            request_builder
                .temperature(params.temperature)
                .max_completion_tokens(params.max_tokens);
        }

        request_builder
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))
    }

    fn map_error(e: OpenAIError) -> LlmError {
        let err_str = e.to_string();
        if err_str.contains("401") || err_str.contains("authentication") {
            LlmError::AuthError(err_str)
        } else if err_str.contains("429") || err_str.contains("rate limit") {
            LlmError::RateLimitExceeded
        } else {
            LlmError::ApiError(err_str)
        }
    }

    /// Проверяет, поддерживает ли модель temperature и max_completion_tokens
    ///
    /// o1/o3 и GPT-5 принимают только значения по умолчанию.
    fn supports_advanced_params(model_id: &str) -> bool {
        let is_restricted = model_id.starts_with("gpt-5")
            || model_id.starts_with("o1-")
            || model_id.starts_with("o3-");

        !is_restricted
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<LlmResponse, LlmError> {
        let request = Self::build_request(model, messages, params, false)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(Self::map_error)?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.clone().unwrap_or_default(),
            tokens_used: response.usage.as_ref().map(|u| u.total_tokens as i32),
            model: response.model.clone(),
            finish_reason: choice.finish_reason.as_ref().map(|r| format!("{:?}", r)),
        })
    }

    async fn chat_completion_stream(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<TextStream, LlmError> {
        let request = Self::build_request(model, messages, params, true)?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(Self::map_error)?;

        let text = stream.filter_map(|chunk| async move {
            match chunk {
                Ok(resp) => {
                    let delta: String = resp
                        .choices
                        .iter()
                        .filter_map(|c| c.delta.content.as_deref())
                        .collect();
                    (!delta.is_empty()).then_some(Ok(delta))
                }
                Err(e) => Some(Err(Self::map_error(e))),
            }
        });

        Ok(text.boxed())
    }

    fn provider_name(&self) -> &str {
        "OpenAI-compatible"
    }
}
