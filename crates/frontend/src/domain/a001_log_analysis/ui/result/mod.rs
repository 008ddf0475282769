//! Структурированный результат анализа

use crate::shared::components::{DiagramView, DiffView, SeverityBadge};
use crate::shared::icons::icon;
use contracts::domain::a001_log_analysis::LogAnalysis;
use leptos::prelude::*;
use thaw::*;

fn field(title: &'static str, text: String) -> impl IntoView {
    view! {
        <section class="analysis-field">
            <h3 class="analysis-field__title">{title}</h3>
            <p class="analysis-field__text">{text}</p>
        </section>
    }
}

/// Секция диаграммы показывается только при непустом исходнике
fn has_diagram(analysis: &LogAnalysis) -> bool {
    !analysis.mermaid_diagram.trim().is_empty()
}

#[component]
pub fn AnalysisResult(analysis: LogAnalysis) -> impl IntoView {
    let explain_open = RwSignal::new(false);
    let has_diagram = has_diagram(&analysis);
    let diagram = Signal::stored(analysis.mermaid_diagram.clone());
    let proper_fix = analysis.proper_fix.clone();
    let prevention = analysis.prevention.clone();

    view! {
        <div class="analysis-result">
            <div class="analysis-result__header">
                <h2>"Analysis"</h2>
                <SeverityBadge severity=analysis.severity />
            </div>

            {field("Diagnosis", analysis.diagnosis.clone())}
            {field("Root cause", analysis.root_cause.clone())}

            <section class="analysis-field">
                <h3 class="analysis-field__title">"Evidence"</h3>
                <pre class="analysis-field__evidence">{analysis.evidence.clone()}</pre>
            </section>

            <section class="analysis-field">
                <h3 class="analysis-field__title">"Code fix"</h3>
                <DiffView
                    original=analysis.original_code_snippet.clone()
                    fixed=analysis.fixed_code_snippet.clone()
                />
            </section>

            {has_diagram
                .then(|| {
                    view! {
                        <section class="analysis-field">
                            <h3 class="analysis-field__title">"Flow"</h3>
                            <DiagramView source=diagram />
                        </section>
                    }
                })}

            {field("Quick fix", analysis.quick_fix.clone())}

            <Button
                appearance=ButtonAppearance::Subtle
                on_click=move |_| explain_open.update(|open| *open = !*open)
            >
                {move || if explain_open.get() { icon("chevron-down") } else { icon("chevron-right") }}
                " Explain"
            </Button>

            {move || {
                explain_open
                    .get()
                    .then(|| {
                        view! {
                            <div class="analysis-result__explain">
                                {field("Proper fix", proper_fix.clone())}
                                {field("Prevention", prevention.clone())}
                            </div>
                        }
                    })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::components::diagram_view::{apply_render, DiagramOutcome};
    use crate::shared::components::diff_view::diff_panes;
    use crate::shared::components::severity_badge::severity_tone;
    use contracts::domain::a001_log_analysis::Severity;
    use serde_json::json;

    fn analysis_with_diagram(diagram: &str) -> LogAnalysis {
        LogAnalysis::from_value(&json!({
            "diagnosis": "Connection refused",
            "root_cause": "Nothing listens on 8080",
            "evidence": "[ERROR] Connection timeout at 127.0.0.1:8080",
            "original_code_snippet": "let port = 8081;",
            "fixed_code_snippet": "let port = 8080;",
            "mermaid_diagram": diagram,
            "severity": "High",
            "quick_fix": "Start the server",
            "proper_fix": "Read the port from config",
            "prevention": "Health checks"
        }))
        .unwrap()
    }

    #[test]
    fn test_broken_diagram_leaves_other_sections_intact() {
        let analysis = analysis_with_diagram("A-->B[unclosed");
        assert!(has_diagram(&analysis));

        let outcome = apply_render(
            Err("Parse error".to_string()),
            &analysis.mermaid_diagram,
        );
        assert!(matches!(outcome, DiagramOutcome::Failed(ref f) if f.source == "A-->B[unclosed"));

        // Поля и diff строятся из результата, а не из итога рендера
        assert!(diff_panes(
            &analysis.original_code_snippet,
            &analysis.fixed_code_snippet
        )
        .is_some());
        assert_eq!(analysis.severity, Severity::High);
        assert_eq!(severity_tone(analysis.severity), "danger");
        assert_eq!(analysis.quick_fix, "Start the server");
    }

    #[test]
    fn test_blank_diagram_hides_section() {
        assert!(!has_diagram(&analysis_with_diagram("  \n ")));
    }
}
