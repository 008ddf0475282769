use serde::{Deserialize, Serialize};

/// Режим анализа: структурированный JSON или свободный markdown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Structured,
    Normal,
}

impl AnalysisMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            AnalysisMode::Structured => "/api/analyze",
            AnalysisMode::Normal => "/api/chat",
        }
    }
}

/// Цикл одной отправки: Idle → Submitting → (Rendering | Failed) → Idle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Rendering,
    Failed(String),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    /// Начать отправку. Пока предыдущая не завершилась, новая отклоняется.
    pub fn begin(&mut self) -> Result<(), &'static str> {
        if self.is_submitting() {
            return Err("An analysis is already in progress");
        }
        *self = SubmissionState::Submitting;
        Ok(())
    }

    /// Ответ получен; игнорируется, если отправка уже не активна
    pub fn succeed(&mut self) -> bool {
        if !self.is_submitting() {
            return false;
        }
        *self = SubmissionState::Rendering;
        true
    }

    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !self.is_submitting() {
            return false;
        }
        *self = SubmissionState::Failed(message.into());
        true
    }

    /// Пользователь подтвердил ошибку или закрыл результат
    pub fn reset(&mut self) {
        if !self.is_submitting() {
            *self = SubmissionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = SubmissionState::default();
        assert!(state.begin().is_ok());
        assert!(state.succeed());
        assert_eq!(state, SubmissionState::Rendering);
        state.reset();
        assert_eq!(state, SubmissionState::Idle);
    }

    #[test]
    fn test_second_submission_rejected_while_in_flight() {
        let mut state = SubmissionState::default();
        state.begin().unwrap();
        assert!(state.begin().is_err());
        assert!(state.is_submitting());
    }

    #[test]
    fn test_failure_then_acknowledge() {
        let mut state = SubmissionState::default();
        state.begin().unwrap();
        assert!(state.fail("HTTP 500"));
        assert_eq!(state, SubmissionState::Failed("HTTP 500".into()));
        state.reset();
        assert_eq!(state, SubmissionState::Idle);
        assert!(state.begin().is_ok());
    }

    #[test]
    fn test_late_results_ignored_outside_submission() {
        let mut state = SubmissionState::Idle;
        assert!(!state.succeed());
        assert!(!state.fail("late"));
        assert_eq!(state, SubmissionState::Idle);
    }

    #[test]
    fn test_reset_does_not_cancel_in_flight() {
        let mut state = SubmissionState::default();
        state.begin().unwrap();
        state.reset();
        assert!(state.is_submitting());
    }

    #[test]
    fn test_mode_endpoints_and_wire_names() {
        assert_eq!(AnalysisMode::Structured.endpoint(), "/api/analyze");
        assert_eq!(AnalysisMode::Normal.endpoint(), "/api/chat");
        assert_eq!(
            serde_json::to_string(&AnalysisMode::Normal).unwrap(),
            "\"normal\""
        );
    }
}
