//! Последовательный перебор моделей: первая успешная побеждает.
//!
//! Каждая модель пробуется не более одного раза, без повторов и задержек.
//! Любая ошибка (сеть, статус, разбор ответа) переводит к следующей модели.

use super::types::{ChatMessage, GenerationParams, LlmError, LlmProvider, TextStream};
use crate::shared::format::truncate_for_log;
use futures::StreamExt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("No models configured")]
    NoModels,

    /// Все модели отказали, сообщение: ошибка последней попытки
    #[error("{last_error}")]
    Exhausted { attempts: usize, last_error: String },
}

/// Успешный результат вместе с моделью, которая его дала
#[derive(Debug)]
pub struct GatewayOutcome<T> {
    pub model: String,
    pub value: T,
}

pub struct ModelGateway<P: LlmProvider> {
    provider: P,
    models: Vec<String>,
    params: GenerationParams,
}

impl<P: LlmProvider> ModelGateway<P> {
    pub fn new(provider: P, models: Vec<String>, params: GenerationParams) -> Self {
        Self {
            provider,
            models,
            params,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Запросить модели по очереди и вернуть первый ответ, который прошёл `parse`.
    ///
    /// Ошибка `parse` считается отказом модели.
    pub async fn first_success<T, F>(
        &self,
        messages: &[ChatMessage],
        parse: F,
    ) -> Result<GatewayOutcome<T>, GatewayError>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        let mut last_error = None;

        for (attempt, model) in self.models.iter().enumerate() {
            tracing::info!(
                "LLM attempt {}/{} via {}: model={}",
                attempt + 1,
                self.models.len(),
                self.provider.provider_name(),
                model
            );

            let result = self
                .provider
                .chat_completion(model, messages.to_vec(), self.params)
                .await
                .map_err(|e| e.to_string())
                .and_then(|response| {
                    tracing::debug!(
                        "Model {} answered ({:?} tokens): {}",
                        model,
                        response.tokens_used,
                        truncate_for_log(&response.content, 200)
                    );
                    parse(&response.content)
                });

            match result {
                Ok(value) => {
                    tracing::info!("Model {} succeeded", model);
                    return Ok(GatewayOutcome {
                        model: model.clone(),
                        value,
                    });
                }
                Err(e) => {
                    tracing::warn!("Model {} failed: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last_error) => Err(GatewayError::Exhausted {
                attempts: self.models.len(),
                last_error,
            }),
            None => Err(GatewayError::NoModels),
        }
    }

    /// Открыть поток у первой модели, принявшей запрос.
    ///
    /// Статус HTTP у потокового ответа становится известен только с первым
    /// фрагментом, поэтому модель считается принявшей запрос, когда пришёл
    /// первый непустой фрагмент. Ошибка или пустой поток ведут к следующей модели.
    pub async fn first_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<GatewayOutcome<TextStream>, GatewayError> {
        let mut last_error: Option<LlmError> = None;

        for model in &self.models {
            let mut stream = match self
                .provider
                .chat_completion_stream(model, messages.to_vec(), self.params)
                .await
            {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!("Model {} refused stream: {}", model, e);
                    last_error = Some(e);
                    continue;
                }
            };

            match stream.next().await {
                Some(Ok(first)) => {
                    tracing::info!("Streaming from model {}", model);
                    let value = futures::stream::once(futures::future::ready(Ok(first)))
                        .chain(stream)
                        .boxed();
                    return Ok(GatewayOutcome {
                        model: model.clone(),
                        value,
                    });
                }
                Some(Err(e)) => {
                    tracing::warn!("Model {} failed before first chunk: {}", model, e);
                    last_error = Some(e);
                }
                None => {
                    tracing::warn!("Model {} returned an empty stream", model);
                    last_error = Some(LlmError::InvalidResponse("Empty stream".to_string()));
                }
            }
        }

        match last_error {
            Some(e) => Err(GatewayError::Exhausted {
                attempts: self.models.len(),
                last_error: e.to_string(),
            }),
            None => Err(GatewayError::NoModels),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::llm::types::LlmResponse;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Провайдер с заранее заданными ответами по моделям
    #[derive(Default)]
    pub(crate) struct ScriptedProvider {
        replies: HashMap<String, Result<String, String>>,
        /// Модели, чей поток открывается, но первым фрагментом отдаёт ошибку
        broken_streams: HashSet<String>,
        pub(crate) calls: Mutex<Vec<String>>,
        pub(crate) seen_messages: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        pub(crate) fn reply(mut self, model: &str, content: &str) -> Self {
            self.replies
                .insert(model.to_string(), Ok(content.to_string()));
            self
        }

        pub(crate) fn fail(mut self, model: &str, error: &str) -> Self {
            self.replies
                .insert(model.to_string(), Err(error.to_string()));
            self
        }

        pub(crate) fn fail_mid_open(mut self, model: &str, error: &str) -> Self {
            self.broken_streams.insert(model.to_string());
            self.fail(model, error)
        }

        fn answer(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(model.to_string());
            self.seen_messages.lock().unwrap().push(messages);
            match self.replies.get(model) {
                Some(Ok(content)) => Ok(content.clone()),
                Some(Err(e)) => Err(LlmError::ApiError(e.clone())),
                None => Err(LlmError::ApiError(format!("unknown model {}", model))),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn chat_completion(
            &self,
            model: &str,
            messages: Vec<ChatMessage>,
            _params: GenerationParams,
        ) -> Result<LlmResponse, LlmError> {
            let content = self.answer(model, messages)?;
            Ok(LlmResponse {
                content,
                tokens_used: None,
                model: model.to_string(),
                finish_reason: None,
            })
        }

        async fn chat_completion_stream(
            &self,
            model: &str,
            messages: Vec<ChatMessage>,
            _params: GenerationParams,
        ) -> Result<TextStream, LlmError> {
            if self.broken_streams.contains(model) {
                // Как у HTTP-стрима: запрос «принят», статус приходит первым элементом
                let error = self.answer(model, messages).unwrap_err();
                return Ok(futures::stream::iter(vec![Err(error)]).boxed());
            }
            let content = self.answer(model, messages)?;
            let chunks: Vec<Result<String, LlmError>> = content
                .split_inclusive(' ')
                .map(|s| Ok(s.to_string()))
                .collect();
            Ok(futures::stream::iter(chunks).boxed())
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }
    }

    pub(crate) fn params() -> GenerationParams {
        GenerationParams {
            temperature: 0.1,
            max_tokens: 1024,
        }
    }

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn parse_number(text: &str) -> Result<i64, String> {
        text.trim().parse::<i64>().map_err(|e| e.to_string())
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let provider = ScriptedProvider::default()
            .fail("m1", "503 Service Unavailable")
            .reply("m2", "42")
            .reply("m3", "7");
        let gateway = ModelGateway::new(provider, models(&["m1", "m2", "m3"]), params());

        let outcome = gateway
            .first_success(&[ChatMessage::user("q")], parse_number)
            .await
            .unwrap();
        assert_eq!(outcome.model, "m2");
        assert_eq!(outcome.value, 42);
        assert_eq!(*gateway.provider.calls.lock().unwrap(), vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn test_parse_failure_advances_chain() {
        let provider = ScriptedProvider::default()
            .reply("m1", "not a number")
            .reply("m2", "5");
        let gateway = ModelGateway::new(provider, models(&["m1", "m2"]), params());

        let outcome = gateway
            .first_success(&[ChatMessage::user("q")], parse_number)
            .await
            .unwrap();
        assert_eq!(outcome.model, "m2");
    }

    #[tokio::test]
    async fn test_exhausted_reports_last_error_and_tries_each_once() {
        let provider = ScriptedProvider::default()
            .fail("m1", "first failure")
            .fail("m2", "second failure")
            .reply("m3", "garbage");
        let gateway = ModelGateway::new(provider, models(&["m1", "m2", "m3"]), params());

        let err = gateway
            .first_success(&[ChatMessage::user("q")], parse_number)
            .await
            .unwrap_err();

        let expected_last = parse_number("garbage").unwrap_err();
        assert_eq!(err.to_string(), expected_last);
        assert_eq!(
            err,
            GatewayError::Exhausted {
                attempts: 3,
                last_error: expected_last
            }
        );
        assert_eq!(
            *gateway.provider.calls.lock().unwrap(),
            vec!["m1", "m2", "m3"]
        );
    }

    #[tokio::test]
    async fn test_last_transport_error_message() {
        let provider = ScriptedProvider::default()
            .reply("m1", "nope")
            .fail("m2", "connection refused");
        let gateway = ModelGateway::new(provider, models(&["m1", "m2"]), params());

        let err = gateway
            .first_success(&[ChatMessage::user("q")], parse_number)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            LlmError::ApiError("connection refused".into()).to_string()
        );
    }

    #[tokio::test]
    async fn test_no_models() {
        let gateway = ModelGateway::new(ScriptedProvider::default(), vec![], params());
        let err = gateway
            .first_success(&[ChatMessage::user("q")], parse_number)
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::NoModels);
    }

    #[tokio::test]
    async fn test_stream_falls_back_and_forwards_chunks() {
        let provider = ScriptedProvider::default()
            .fail("m1", "429 rate limit")
            .reply("m2", "## Cause\nport closed");
        let gateway = ModelGateway::new(provider, models(&["m1", "m2"]), params());

        let outcome = gateway
            .first_stream(&[ChatMessage::user("q")])
            .await
            .unwrap();
        assert_eq!(outcome.model, "m2");

        let chunks: Vec<String> = outcome
            .value
            .map(|c| c.unwrap())
            .collect()
            .await;
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), "## Cause\nport closed");
    }

    #[tokio::test]
    async fn test_stream_error_in_first_chunk_advances_chain() {
        let provider = ScriptedProvider::default()
            .fail_mid_open("m1", "429 Too Many Requests")
            .reply("m2", "## Cause\nrate limit");
        let gateway = ModelGateway::new(provider, models(&["m1", "m2"]), params());

        let outcome = gateway
            .first_stream(&[ChatMessage::user("q")])
            .await
            .unwrap();
        assert_eq!(outcome.model, "m2");
        assert_eq!(*gateway.provider.calls.lock().unwrap(), vec!["m1", "m2"]);

        let chunks: Vec<String> = outcome.value.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks.concat(), "## Cause\nrate limit");
    }

    #[tokio::test]
    async fn test_stream_all_fail_reports_last_error() {
        let provider = ScriptedProvider::default()
            .reply("m1", "")
            .fail_mid_open("m2", "503 Service Unavailable");
        let gateway = ModelGateway::new(provider, models(&["m1", "m2"]), params());

        let err = gateway
            .first_stream(&[ChatMessage::user("q")])
            .await
            .err()
            .unwrap();
        assert_eq!(
            err,
            GatewayError::Exhausted {
                attempts: 2,
                last_error: LlmError::ApiError("503 Service Unavailable".into()).to_string(),
            }
        );
        assert_eq!(*gateway.provider.calls.lock().unwrap(), vec!["m1", "m2"]);
    }
}
