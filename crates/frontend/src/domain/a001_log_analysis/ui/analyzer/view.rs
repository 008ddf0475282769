//! Log Analysis - View Component

use super::view_model::AnalyzerVm;
use crate::domain::a001_log_analysis::ui::chat_stream::ChatStreamView;
use crate::domain::a001_log_analysis::ui::result::AnalysisResult;
use crate::domain::a002_analysis_history::ui::panel::HistoryPanel;
use crate::shared::icons::icon;
use contracts::domain::a001_log_analysis::AnalysisMode;
use leptos::prelude::*;
use thaw::*;

#[component]
#[allow(non_snake_case)]
pub fn LogAnalyzer() -> impl IntoView {
    let vm = AnalyzerVm::new();
    let submitting = Signal::derive(move || vm.is_submitting());

    let handle_submit = Callback::new(move |_: ()| vm.submit());
    let on_select = Callback::new(move |id: i64| vm.open_entry(id));
    let on_clear = Callback::new(move |_: ()| vm.clear_history());

    view! {
        <div class="log-doctor">
            <div class="log-doctor__main">
                <div class="analyzer-form">
                    <label class="analyzer-form__label">"Error log"</label>
                    <Textarea
                        value=vm.log_text
                        placeholder="Paste the error log or stack trace... (Ctrl+Enter to analyze)"
                        attr:style="width: 100%; min-height: 180px; font-family: monospace;"
                        disabled=submitting
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" && ev.ctrl_key() {
                                ev.prevent_default();
                                handle_submit.run(());
                            }
                        }
                    />

                    <label class="analyzer-form__label">"Code snippet (optional)"</label>
                    <Textarea
                        value=vm.code_text
                        placeholder="Paste the related code, if any"
                        attr:style="width: 100%; min-height: 100px; font-family: monospace;"
                        disabled=submitting
                    />

                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <Switch checked=vm.normal_mode label="Normal mode (streamed markdown)" />
                        <Flex align=FlexAlign::Center style="gap: 8px;">
                            {move || {
                                vm.is_rendering()
                                    .then(|| {
                                        view! {
                                            <Button
                                                appearance=ButtonAppearance::Secondary
                                                on_click=move |_| vm.new_analysis()
                                            >
                                                {icon("refresh")}
                                                " New analysis"
                                            </Button>
                                        }
                                    })
                            }}
                            <Button
                                appearance=ButtonAppearance::Primary
                                disabled=submitting
                                on_click=move |_| handle_submit.run(())
                            >
                                {icon("search")}
                                {move || if submitting.get() { " Analyzing..." } else { " Analyze" }}
                            </Button>
                        </Flex>
                    </Flex>
                </div>

                {move || {
                    let is_submitting = submitting.get();
                    if !is_submitting && !vm.is_rendering() {
                        return view! {}.into_any();
                    }
                    match vm.shown_mode.get() {
                        AnalysisMode::Normal => {
                            view! { <ChatStreamView markdown=vm.markdown streaming=submitting /> }
                                .into_any()
                        }
                        AnalysisMode::Structured => match vm.result.get() {
                            Some(analysis) => view! { <AnalysisResult analysis=analysis /> }.into_any(),
                            None => {
                                view! {
                                    <div class="analyzer-pending">
                                        <Spinner />
                                        <span>"Analyzing the log..."</span>
                                    </div>
                                }
                                    .into_any()
                            }
                        },
                    }
                }}
            </div>

            <aside class="log-doctor__side">
                <HistoryPanel
                    entries=vm.history_entries
                    disabled=submitting
                    on_select=on_select
                    on_clear=on_clear
                />
            </aside>
        </div>
    }
}
