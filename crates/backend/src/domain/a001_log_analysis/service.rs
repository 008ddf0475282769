use super::prompt::{NORMAL_SYSTEM_PROMPT, STRUCTURED_SYSTEM_PROMPT};
use crate::shared::config::LlmConfig;
use crate::shared::llm::json_extract::extract_json;
use crate::shared::llm::openai_provider::OpenAiProvider;
use crate::shared::llm::types::{ChatMessage, ChatRole, GenerationParams, LlmProvider, TextStream};
use crate::shared::llm::{GatewayError, GatewayOutcome, ModelGateway};
use contracts::domain::a001_log_analysis::{AnalyzeRequest, LogAnalysis};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Ключ API не задан: запрос не отправляется ни одной модели
    #[error("Missing API key: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("All models failed")]
    Gateway(#[from] GatewayError),
}

/// Собрать шлюз из конфигурации. Проверка ключа выполняется до любого сетевого вызова.
pub fn build_gateway(config: &LlmConfig) -> Result<ModelGateway<OpenAiProvider>, AnalysisError> {
    let api_key = config
        .api_key()
        .ok_or_else(|| AnalysisError::MissingCredential(config.api_key_env.clone()))?;

    let provider = OpenAiProvider::new_with_endpoint(&config.api_base, &api_key);
    let params = GenerationParams {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };
    Ok(ModelGateway::new(provider, config.models.clone(), params))
}

/// Системная инструкция + сообщения клиента (системные сообщения клиента отбрасываются)
fn compose_messages(
    system_prompt: &str,
    request: &AnalyzeRequest,
) -> Result<Vec<ChatMessage>, AnalysisError> {
    if request.user_payload().is_none() {
        return Err(AnalysisError::InvalidRequest(
            "messages must contain a non-empty user message".into(),
        ));
    }

    let mut messages = vec![ChatMessage::system(system_prompt)];
    messages.extend(
        request
            .messages
            .iter()
            .cloned()
            .map(ChatMessage::from)
            .filter(|m| m.role != ChatRole::System),
    );
    Ok(messages)
}

/// Разобрать ответ модели в `LogAnalysis`, любая ошибка считается отказом этой модели
pub fn parse_analysis(text: &str) -> Result<LogAnalysis, String> {
    let value = extract_json(text)?;
    LogAnalysis::from_value(&value).map_err(|e| format!("Malformed result: {}", e))
}

/// Структурированный анализ лога
pub async fn analyze<P: LlmProvider>(
    gateway: &ModelGateway<P>,
    request: &AnalyzeRequest,
) -> Result<LogAnalysis, AnalysisError> {
    let messages = compose_messages(STRUCTURED_SYSTEM_PROMPT, request)?;
    let outcome = gateway.first_success(&messages, parse_analysis).await?;
    tracing::info!(
        "Analysis ready from {}: severity={}",
        outcome.model,
        outcome.value.severity.as_str()
    );
    Ok(outcome.value)
}

/// Обычный режим: поток markdown от первой принявшей модели
pub async fn stream_chat<P: LlmProvider>(
    gateway: &ModelGateway<P>,
    request: &AnalyzeRequest,
) -> Result<GatewayOutcome<TextStream>, AnalysisError> {
    let messages = compose_messages(NORMAL_SYSTEM_PROMPT, request)?;
    Ok(gateway.first_stream(&messages).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::llm::gateway::tests::{params, ScriptedProvider};
    use contracts::domain::a001_log_analysis::{AnalysisRequest, Severity};
    use futures::StreamExt;

    const LOG: &str = "[ERROR] Connection timeout at 127.0.0.1:8080";

    const GOOD_JSON: &str = r#"{
        "diagnosis": "The client could not reach the server",
        "root_cause": "Nothing is listening on 127.0.0.1:8080",
        "evidence": "[ERROR] Connection timeout at 127.0.0.1:8080",
        "original_code_snippet": "",
        "fixed_code_snippet": "",
        "mermaid_diagram": "A[Client]-->B[127.0.0.1:8080]",
        "severity": "High",
        "quick_fix": "Start the service",
        "proper_fix": "Add a readiness probe",
        "prevention": "Alert on port availability"
    }"#;

    fn gateway(provider: ScriptedProvider, models: &[&str]) -> ModelGateway<ScriptedProvider> {
        ModelGateway::new(
            provider,
            models.iter().map(|s| s.to_string()).collect(),
            params(),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_single_user_message() {
        let gw = gateway(
            ScriptedProvider::default().reply("m1", &format!("Sure! Here you go:\n{}\n", GOOD_JSON)),
            &["m1"],
        );
        let request = AnalysisRequest::new(LOG, Some(String::new())).unwrap().into_wire();

        let analysis = analyze(&gw, &request).await.unwrap();
        assert_eq!(analysis.severity, Severity::High);
        assert!(!analysis.has_code_diff());

        let seen = gw_seen(&gw);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 2);
        assert_eq!(seen[0][0], ChatMessage::system(STRUCTURED_SYSTEM_PROMPT));
        assert_eq!(seen[0][1], ChatMessage::user(LOG));
    }

    fn gw_seen(gw: &ModelGateway<ScriptedProvider>) -> Vec<Vec<ChatMessage>> {
        gw_provider(gw).seen_messages.lock().unwrap().clone()
    }

    fn gw_provider(gw: &ModelGateway<ScriptedProvider>) -> &ScriptedProvider {
        gw.provider()
    }

    #[tokio::test]
    async fn test_malformed_result_falls_through_to_next_model() {
        let gw = gateway(
            ScriptedProvider::default()
                .reply("m1", r#"{"diagnosis": "only one field"}"#)
                .reply("m2", GOOD_JSON),
            &["m1", "m2"],
        );
        let request = AnalysisRequest::new(LOG, None).unwrap().into_wire();
        assert!(analyze(&gw, &request).await.is_ok());
        assert_eq!(*gw_provider(&gw).calls.lock().unwrap(), vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn test_all_models_fail() {
        let gw = gateway(
            ScriptedProvider::default()
                .fail("m1", "boom")
                .reply("m2", "I am not JSON"),
            &["m1", "m2"],
        );
        let request = AnalysisRequest::new(LOG, None).unwrap().into_wire();
        match analyze(&gw, &request).await {
            Err(AnalysisError::Gateway(GatewayError::Exhausted { last_error, .. })) => {
                assert_eq!(last_error, parse_analysis("I am not JSON").unwrap_err());
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_empty_user_message_rejected_before_any_call() {
        let gw = gateway(ScriptedProvider::default().reply("m1", GOOD_JSON), &["m1"]);
        let request = AnalyzeRequest { messages: vec![] };
        assert!(matches!(
            analyze(&gw, &request).await,
            Err(AnalysisError::InvalidRequest(_))
        ));
        assert!(gw_provider(&gw).calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_credential_detected_without_network() {
        let config = LlmConfig {
            api_base: "http://127.0.0.1:9".into(),
            api_key_env: "LOG_DOCTOR_TEST_MISSING_KEY".into(),
            models: vec!["m1".into()],
            temperature: 0.1,
            max_tokens: 256,
        };
        assert!(matches!(
            build_gateway(&config),
            Err(AnalysisError::MissingCredential(name)) if name == "LOG_DOCTOR_TEST_MISSING_KEY"
        ));
    }

    #[tokio::test]
    async fn test_stream_chat_uses_markdown_prompt() {
        let gw = gateway(
            ScriptedProvider::default().reply("m1", "## Diagnosis timeout"),
            &["m1"],
        );
        let request = AnalysisRequest::new(LOG, None).unwrap().into_wire();
        let outcome = stream_chat(&gw, &request).await.unwrap();
        let text: Vec<String> = outcome.value.map(|c| c.unwrap()).collect().await;
        assert_eq!(text.concat(), "## Diagnosis timeout");
        assert_eq!(gw_seen(&gw)[0][0], ChatMessage::system(NORMAL_SYSTEM_PROMPT));
    }
}
