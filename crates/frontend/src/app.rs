use crate::domain::a001_log_analysis::ui::analyzer::LogAnalyzer;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <div class="app-shell">
                <header class="app-header">
                    <h1 class="app-header__title">"Log Doctor"</h1>
                    <span class="app-header__subtitle">
                        "Paste an error log, get a diagnosis, a fix and a diagram"
                    </span>
                </header>
                <LogAnalyzer />
            </div>
        </ConfigProvider>
    }
}
