//! Ответ обычного режима: markdown, дорисовывается по мере прихода фрагментов

use crate::shared::markdown::render_markdown;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn ChatStreamView(
    markdown: RwSignal<String>,
    #[prop(into)] streaming: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="chat-stream">
            <div class="markdown-body" inner_html=move || render_markdown(&markdown.get())></div>
            {move || {
                streaming
                    .get()
                    .then(|| {
                        view! {
                            <div class="chat-stream__status">
                                <Spinner size=SpinnerSize::Small />
                                <span>"Generating..."</span>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
