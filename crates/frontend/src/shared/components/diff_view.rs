//! Двухколоночный пословный diff исходного и исправленного кода

use crate::shared::clipboard::copy_to_clipboard_with_callback;
use crate::shared::icons::icon;
use contracts::shared::diff::{split_panes, word_diff, DiffKind, DiffPanes, DiffSegment};
use leptos::prelude::*;
use thaw::*;

/// Панели diff, если оба фрагмента непустые; иначе показывается заглушка
pub fn diff_panes(original: &str, fixed: &str) -> Option<DiffPanes> {
    if original.trim().is_empty() || fixed.trim().is_empty() {
        return None;
    }
    Some(split_panes(&word_diff(original, fixed)))
}

fn segment_class(kind: DiffKind) -> &'static str {
    match kind {
        DiffKind::Equal => "diff-seg",
        DiffKind::Removed => "diff-seg diff-seg--removed",
        DiffKind::Added => "diff-seg diff-seg--added",
    }
}

fn render_segments(segments: Vec<DiffSegment>) -> impl IntoView {
    segments
        .into_iter()
        .map(|seg| view! { <span class=segment_class(seg.kind)>{seg.text}</span> })
        .collect_view()
}

#[component]
pub fn DiffView(original: String, fixed: String) -> impl IntoView {
    let Some(panes) = diff_panes(&original, &fixed) else {
        return view! {
            <div class="diff-placeholder">"No code found"</div>
        }
        .into_any();
    };

    let (copied, set_copied) = signal(false);

    // Копирование исправленного кода как есть
    let handle_copy = move |_| {
        copy_to_clipboard_with_callback(&fixed, move || {
            set_copied.set(true);
            // Сбросить через 2 секунды
            leptos::task::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(2000).await;
                set_copied.set(false);
            });
        });
    };

    view! {
        <div class="diff-view">
            <div class="diff-view__toolbar">
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Secondary
                    on_click=handle_copy
                >
                    {move || if copied.get() { icon("check") } else { icon("copy") }}
                    {move || if copied.get() { " Copied!" } else { " Copy fix" }}
                </Button>
            </div>
            <div class="diff-view__panes">
                <div class="diff-pane diff-pane--before">
                    <div class="diff-pane__title">"Before"</div>
                    <pre class="diff-pane__code">{render_segments(panes.before)}</pre>
                </div>
                <div class="diff-pane diff-pane--after">
                    <div class="diff-pane__title">"After"</div>
                    <pre class="diff-pane__code">{render_segments(panes.after)}</pre>
                </div>
            </div>
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_when_either_snippet_is_empty() {
        assert!(diff_panes("", "fixed()").is_none());
        assert!(diff_panes("let x = 1;", "   \n").is_none());
    }

    #[test]
    fn test_changed_argument_splits_into_panes() {
        let panes = diff_panes("connect(8080)", "connect(3000)").unwrap();
        assert!(panes
            .before
            .iter()
            .any(|s| s.kind == DiffKind::Removed && s.text == "8080"));
        assert!(panes
            .after
            .iter()
            .any(|s| s.kind == DiffKind::Added && s.text == "3000"));
        assert!(panes.before.iter().all(|s| s.kind != DiffKind::Added));
        assert!(panes.after.iter().all(|s| s.kind != DiffKind::Removed));
    }
}
