use crate::domain::a001_log_analysis::AnalysisMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Длина превью лога в символах
pub const PREVIEW_LEN: usize = 100;

/// Запись истории анализа. После создания не изменяется.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: String,
    pub log_preview: String,
    pub log_full: String,
    /// Сырой результат: JSON для структурированного режима, markdown для обычного
    pub analysis: String,
    #[serde(default)]
    pub mode: AnalysisMode,
}

impl HistoryEntry {
    pub fn new(log_full: &str, analysis: String, mode: AnalysisMode, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis(),
            timestamp: now.to_rfc3339(),
            log_preview: preview(log_full),
            log_full: log_full.to_string(),
            analysis,
            mode,
        }
    }
}

/// Первые [`PREVIEW_LEN`] символов лога, с многоточием при обрезке
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
