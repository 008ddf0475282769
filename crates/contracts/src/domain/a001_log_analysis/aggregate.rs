use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Ошибка валидации ответа модели
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedResult {
    #[error("result is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must be a string")]
    NotAString(&'static str),

    #[error("unknown severity `{0}`")]
    UnknownSeverity(String),
}

/// Критичность проблемы
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Разбор без учёта регистра: модели пишут и "high", и "HIGH"
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// CSS-класс бейджа
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::High => "severity--high",
            Severity::Medium => "severity--medium",
            Severity::Low => "severity--low",
        }
    }
}

/// Структурированный результат анализа лога
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogAnalysis {
    pub diagnosis: String,
    pub root_cause: String,
    pub evidence: String,
    #[serde(default)]
    pub original_code_snippet: String,
    #[serde(default)]
    pub fixed_code_snippet: String,
    #[serde(default)]
    pub mermaid_diagram: String,
    pub severity: Severity,
    pub quick_fix: String,
    pub proper_fix: String,
    pub prevention: String,
}

impl LogAnalysis {
    /// Проверить недоверенный JSON от модели и собрать результат.
    ///
    /// Сниппеты и диаграмма могут отсутствовать или быть `null`, остальные поля обязательны.
    pub fn from_value(value: &Value) -> Result<Self, MalformedResult> {
        let obj = value.as_object().ok_or(MalformedResult::NotAnObject)?;

        let required = |name: &'static str| -> Result<String, MalformedResult> {
            match obj.get(name) {
                None | Some(Value::Null) => Err(MalformedResult::MissingField(name)),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(MalformedResult::NotAString(name)),
            }
        };
        let optional = |name: &'static str| -> Result<String, MalformedResult> {
            match obj.get(name) {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(MalformedResult::NotAString(name)),
            }
        };

        let severity_raw = required("severity")?;
        let severity = Severity::parse(&severity_raw)
            .ok_or_else(|| MalformedResult::UnknownSeverity(severity_raw.clone()))?;

        Ok(Self {
            diagnosis: required("diagnosis")?,
            root_cause: required("root_cause")?,
            evidence: required("evidence")?,
            original_code_snippet: optional("original_code_snippet")?,
            fixed_code_snippet: optional("fixed_code_snippet")?,
            mermaid_diagram: optional("mermaid_diagram")?,
            severity,
            quick_fix: required("quick_fix")?,
            proper_fix: required("proper_fix")?,
            prevention: required("prevention")?,
        })
    }

    /// Diff показывается только когда есть обе версии кода
    pub fn has_code_diff(&self) -> bool {
        !self.original_code_snippet.trim().is_empty() && !self.fixed_code_snippet.trim().is_empty()
    }
}
