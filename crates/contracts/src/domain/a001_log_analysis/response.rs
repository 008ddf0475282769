use serde::{Deserialize, Serialize};

/// Тело ответа при ошибке (`{ error, details? }`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Текст для показа пользователю
    pub fn message(&self) -> String {
        match &self.details {
            Some(d) => format!("{}: {}", self.error, d),
            None => self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_omitted_when_absent() {
        let json = serde_json::to_string(&ErrorResponse::new("Missing API key")).unwrap();
        assert_eq!(json, r#"{"error":"Missing API key"}"#);
    }

    #[test]
    fn test_message_joins_details() {
        let err = ErrorResponse::new("All models failed").with_details("API error: 503");
        assert_eq!(err.message(), "All models failed: API error: 503");
    }
}
