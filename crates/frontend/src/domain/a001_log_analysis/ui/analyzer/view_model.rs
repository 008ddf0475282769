//! Log Analysis - View Model

use super::model;
use crate::shared::storage::LocalStorage;
use chrono::Utc;
use contracts::domain::a001_log_analysis::{
    AnalysisMode, AnalysisRequest, LogAnalysis, SubmissionState,
};
use contracts::domain::a002_analysis_history::{HistoryEntry, HistoryLog};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct AnalyzerVm {
    pub log_text: RwSignal<String>,
    pub code_text: RwSignal<String>,
    /// Переключатель режима: выключен: структурированный, включён: обычный
    pub normal_mode: RwSignal<bool>,
    pub state: RwSignal<SubmissionState>,
    /// Режим отображаемого результата (может отличаться от переключателя)
    pub shown_mode: RwSignal<AnalysisMode>,
    pub result: RwSignal<Option<LogAnalysis>>,
    pub markdown: RwSignal<String>,
    pub history: StoredValue<HistoryLog<LocalStorage>>,
    pub history_entries: RwSignal<Vec<HistoryEntry>>,
}

impl AnalyzerVm {
    pub fn new() -> Self {
        let history = HistoryLog::load(LocalStorage);
        let entries = history.entries().to_vec();
        Self {
            log_text: RwSignal::new(String::new()),
            code_text: RwSignal::new(String::new()),
            normal_mode: RwSignal::new(false),
            state: RwSignal::new(SubmissionState::Idle),
            shown_mode: RwSignal::new(AnalysisMode::Structured),
            result: RwSignal::new(None),
            markdown: RwSignal::new(String::new()),
            history: StoredValue::new(history),
            history_entries: RwSignal::new(entries),
        }
    }

    pub fn selected_mode(&self) -> AnalysisMode {
        if self.normal_mode.get_untracked() {
            AnalysisMode::Normal
        } else {
            AnalysisMode::Structured
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state.with(|s| s.is_submitting())
    }

    pub fn is_rendering(&self) -> bool {
        self.state.with(|s| matches!(s, SubmissionState::Rendering))
    }

    /// Отправить лог на анализ
    pub fn submit(&self) {
        let request = match AnalysisRequest::new(
            self.log_text.get_untracked(),
            Some(self.code_text.get_untracked()),
        ) {
            Ok(r) => r,
            Err(msg) => {
                show_alert(&msg);
                return;
            }
        };

        let mut begun = Ok(());
        self.state.update(|s| begun = s.begin());
        if let Err(msg) = begun {
            log::warn!("Submission rejected: {}", msg);
            return;
        }

        let mode = self.selected_mode();
        self.shown_mode.set(mode);
        self.result.set(None);
        self.markdown.set(String::new());

        let vm = *self;
        let log_full = request.log_text().to_string();
        let wire = request.into_wire();
        log::info!("Submitting {} chars in {:?} mode", log_full.len(), mode);

        leptos::task::spawn_local(async move {
            let outcome = match mode {
                AnalysisMode::Structured => model::analyze(&wire).await.map(|(analysis, raw)| {
                    vm.result.set(Some(analysis));
                    raw
                }),
                AnalysisMode::Normal => {
                    model::stream_chat(&wire, |chunk| vm.markdown.update(|t| t.push_str(chunk)))
                        .await
                }
            };

            match outcome {
                Ok(raw) => {
                    vm.state.update(|s| {
                        s.succeed();
                    });
                    vm.record(&log_full, raw, mode);
                }
                Err(e) => vm.fail(e),
            }
        });
    }

    /// Ошибка: блокирующее сообщение, затем форма снова готова
    fn fail(&self, message: String) {
        log::error!("Analysis failed: {}", message);
        self.state.update(|s| {
            s.fail(message.clone());
        });
        show_alert(&format!("Analysis failed: {}", message));
        self.state.update(|s| s.reset());
    }

    fn record(&self, log_full: &str, analysis: String, mode: AnalysisMode) {
        let entry = HistoryEntry::new(log_full, analysis, mode, Utc::now());
        let mut saved = Ok(());
        self.history.update_value(|h| saved = h.append(entry));
        match saved {
            Ok(()) => self.refresh_history(),
            Err(e) => log::warn!("History entry not saved: {}", e),
        }
    }

    fn refresh_history(&self) {
        self.history_entries
            .set(self.history.with_value(|h| h.entries().to_vec()));
    }

    /// «New analysis»: закрыть результат и очистить форму
    pub fn new_analysis(&self) {
        if self.is_submitting() {
            return;
        }
        self.state.update(|s| s.reset());
        self.result.set(None);
        self.markdown.set(String::new());
        self.log_text.set(String::new());
        self.code_text.set(String::new());
    }

    /// Открыть запись истории в соответствующем режиме
    pub fn open_entry(&self, id: i64) {
        if self.is_submitting() {
            return;
        }
        let Some(entry) = self.history.with_value(|h| h.find(id).cloned()) else {
            return;
        };

        match entry.mode {
            AnalysisMode::Structured => {
                let parsed = serde_json::from_str::<serde_json::Value>(&entry.analysis)
                    .map_err(|e| e.to_string())
                    .and_then(|v| LogAnalysis::from_value(&v).map_err(|e| e.to_string()));
                match parsed {
                    Ok(analysis) => {
                        self.result.set(Some(analysis));
                        self.markdown.set(String::new());
                    }
                    Err(e) => {
                        log::warn!("History entry {} is unreadable: {}", id, e);
                        return;
                    }
                }
            }
            AnalysisMode::Normal => {
                self.result.set(None);
                self.markdown.set(entry.analysis.clone());
            }
        }

        self.log_text.set(entry.log_full);
        self.code_text.set(String::new());
        self.normal_mode.set(entry.mode == AnalysisMode::Normal);
        self.shown_mode.set(entry.mode);
        self.state.set(SubmissionState::Rendering);
    }

    pub fn clear_history(&self) {
        let mut cleared = Ok(());
        self.history.update_value(|h| cleared = h.clear());
        match cleared {
            Ok(()) => self.refresh_history(),
            Err(e) => log::warn!("History not cleared: {}", e),
        }
    }
}

fn show_alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
