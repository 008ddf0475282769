use serde::{Deserialize, Serialize};

/// Заголовок секции лога в объединённом payload
pub const LOG_SECTION_MARKER: &str = "ERROR LOG:";
/// Заголовок секции кода в объединённом payload
pub const CODE_SECTION_MARKER: &str = "CODE SNIPPET:";

/// Роль сообщения в запросе к модели
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// Сообщение в формате wire (`{ role, content }`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Тело запроса к `/api/analyze` и `/api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub messages: Vec<ChatMessage>,
}

impl AnalyzeRequest {
    /// Последнее непустое сообщение пользователя
    pub fn user_payload(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User && !m.content.trim().is_empty())
            .map(|m| m.content.as_str())
    }
}

/// Ввод пользователя: лог ошибки и, опционально, фрагмент кода
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    log_text: String,
    code_text: Option<String>,
}

impl AnalysisRequest {
    /// Создать запрос. Пустой лог недопустим, код из одних пробелов считается отсутствующим.
    pub fn new(log_text: impl Into<String>, code_text: Option<String>) -> Result<Self, String> {
        let log_text = log_text.into();
        if log_text.trim().is_empty() {
            return Err("Log text must not be empty".into());
        }
        let code_text = code_text.filter(|c| !c.trim().is_empty());
        Ok(Self {
            log_text,
            code_text,
        })
    }

    pub fn log_text(&self) -> &str {
        &self.log_text
    }

    pub fn code_text(&self) -> Option<&str> {
        self.code_text.as_deref()
    }

    /// Собрать единый payload для пользовательского сообщения.
    ///
    /// Без кода payload совпадает с текстом лога. С кодом обе части идут
    /// в порядке лог → код под заголовками секций, без каких-либо изменений.
    pub fn build_payload(&self) -> String {
        match &self.code_text {
            Some(code) => format!(
                "{}\n{}\n\n{}\n{}",
                LOG_SECTION_MARKER, self.log_text, CODE_SECTION_MARKER, code
            ),
            None => self.log_text.clone(),
        }
    }

    /// Тело HTTP-запроса с одним сообщением пользователя
    pub fn into_wire(self) -> AnalyzeRequest {
        AnalyzeRequest {
            messages: vec![ChatMessage::user(self.build_payload())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_without_code_is_log_text() {
        let log = "[ERROR] Connection timeout at 127.0.0.1:8080";
        let req = AnalysisRequest::new(log, None).unwrap();
        assert_eq!(req.build_payload(), log);

        let blank_code = AnalysisRequest::new(log, Some("   \n".into())).unwrap();
        assert_eq!(blank_code.build_payload(), log);
    }

    #[test]
    fn test_payload_with_code_keeps_order() {
        let log = "Traceback (most recent call last):\n  KeyError: 'id'";
        let code = "def f(d):\n    return d['id']";
        let payload = AnalysisRequest::new(log, Some(code.into()))
            .unwrap()
            .build_payload();

        let log_marker = payload.find(LOG_SECTION_MARKER).unwrap();
        let log_pos = payload.find(log).unwrap();
        let code_marker = payload.find(CODE_SECTION_MARKER).unwrap();
        let code_pos = payload.find(code).unwrap();
        assert!(log_marker < log_pos);
        assert!(log_pos < code_marker);
        assert!(code_marker < code_pos);
    }

    #[test]
    fn test_empty_log_rejected() {
        assert!(AnalysisRequest::new("  \n\t", Some("fn main() {}".into())).is_err());
    }

    #[test]
    fn test_wire_request_has_single_user_message() {
        let log = "[ERROR] Connection timeout at 127.0.0.1:8080";
        let wire = AnalysisRequest::new(log, None).unwrap().into_wire();
        assert_eq!(wire.messages, vec![ChatMessage::user(log)]);
        assert_eq!(wire.user_payload(), Some(log));

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], log);
    }

    #[test]
    fn test_user_payload_skips_blank_messages() {
        let req = AnalyzeRequest {
            messages: vec![
                ChatMessage::user("real log"),
                ChatMessage {
                    role: ChatRole::Assistant,
                    content: "hi".into(),
                },
                ChatMessage::user("  "),
            ],
        };
        assert_eq!(req.user_payload(), Some("real log"));
        assert_eq!(AnalyzeRequest { messages: vec![] }.user_payload(), None);
    }
}
