use crate::shared::mermaid::{next_diagram_id, render_mermaid, RenderGuard};
use contracts::shared::diagram::normalize_diagram;
use leptos::prelude::*;

/// Ошибка рендера: сообщение и исходник в том виде, как его прислала модель
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramFailure {
    pub message: String,
    pub source: String,
}

/// Итог одного рендера
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramOutcome {
    Svg(String),
    Failed(DiagramFailure),
}

/// Разобрать результат mermaid. Ошибка касается только самой диаграммы.
pub fn apply_render(result: Result<String, String>, raw_source: &str) -> DiagramOutcome {
    match result {
        Ok(svg) => DiagramOutcome::Svg(svg),
        Err(message) => DiagramOutcome::Failed(DiagramFailure {
            message,
            source: raw_source.to_string(),
        }),
    }
}

/// Диаграмма mermaid.
///
/// Контейнер очищается при каждой смене исходника. Пустой исходник ничего не
/// рисует. Ошибка рендера не ломает остальной результат: показывается текст
/// ошибки и исходный текст диаграммы в свёрнутом `<details>`.
#[component]
pub fn DiagramView(#[prop(into)] source: Signal<String>) -> impl IntoView {
    let container = NodeRef::<leptos::html::Div>::new();
    let failure = RwSignal::new(None::<DiagramFailure>);
    let guard = RenderGuard::new();

    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    Effect::new(move |_| {
        let raw = source.get();
        let Some(el) = container.get() else {
            return;
        };

        el.set_inner_html("");
        failure.set(None);

        let Some(diagram) = normalize_diagram(&raw) else {
            return;
        };

        let ticket = guard.next_ticket();
        let guard = guard.clone();
        leptos::task::spawn_local(async move {
            let id = next_diagram_id();
            let result = render_mermaid(&id, &diagram).await;

            // Компонент размонтирован или исходник уже сменился
            if !guard.is_current(ticket) {
                return;
            }

            match apply_render(result, &raw) {
                DiagramOutcome::Svg(svg) => el.set_inner_html(&svg),
                DiagramOutcome::Failed(f) => {
                    log::warn!("Diagram render failed: {}", f.message);
                    failure.set(Some(f));
                }
            }
        });
    });

    view! {
        <div class="diagram-view">
            <div class="diagram-view__canvas" node_ref=container></div>
            {move || {
                failure
                    .get()
                    .map(|f| {
                        view! {
                            <div class="diagram-view__error">
                                <p>{format!("Diagram could not be rendered: {}", f.message)}</p>
                                <details>
                                    <summary>"Diagram source"</summary>
                                    <pre>{f.source}</pre>
                                </details>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
