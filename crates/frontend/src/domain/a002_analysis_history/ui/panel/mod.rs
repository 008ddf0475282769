//! Панель истории анализов

use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use contracts::domain::a001_log_analysis::AnalysisMode;
use contracts::domain::a002_analysis_history::{HistoryEntry, MAX_ENTRIES};
use leptos::prelude::*;
use thaw::*;

fn mode_label(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Structured => "structured",
        AnalysisMode::Normal => "markdown",
    }
}

#[component]
pub fn HistoryPanel(
    #[prop(into)] entries: Signal<Vec<HistoryEntry>>,
    /// Недоступна во время отправки
    #[prop(into)]
    disabled: Signal<bool>,
    on_select: Callback<i64>,
    on_clear: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="history-panel">
            <div class="history-panel__header">
                <h3>
                    {icon("history")}
                    {move || format!(" History ({}/{})", entries.get().len(), MAX_ENTRIES)}
                </h3>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    disabled=Signal::derive(move || disabled.get() || entries.get().is_empty())
                    on_click=move |_| on_clear.run(())
                >
                    {icon("delete")}
                    " Clear"
                </Button>
            </div>

            {move || {
                if entries.get().is_empty() {
                    view! { <p class="history-panel__empty">"No analyses yet"</p> }.into_any()
                } else {
                    view! {
                        <ul class="history-panel__list">
                            <For
                                each=move || entries.get()
                                key=|entry| entry.id
                                let:entry
                            >
                                {{
                                    let id = entry.id;
                                    view! {
                                        <li
                                            class=move || {
                                                if disabled.get() {
                                                    "history-panel__item history-panel__item--disabled"
                                                } else {
                                                    "history-panel__item"
                                                }
                                            }
                                            on:click=move |_| {
                                                if !disabled.get_untracked() {
                                                    on_select.run(id);
                                                }
                                            }
                                        >
                                            <div class="history-panel__meta">
                                                <span>{format_datetime(&entry.timestamp)}</span>
                                                <span class="history-panel__mode">{mode_label(entry.mode)}</span>
                                            </div>
                                            <div class="history-panel__preview">{entry.log_preview.clone()}</div>
                                        </li>
                                    }
                                }}
                            </For>
                        </ul>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}
