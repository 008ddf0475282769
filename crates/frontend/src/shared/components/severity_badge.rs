use contracts::domain::a001_log_analysis::Severity;
use leptos::prelude::*;
use thaw::*;

/// Тон бейджа: High → danger, Medium → warning, Low → success
pub fn severity_tone(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "danger",
        Severity::Medium => "warning",
        Severity::Low => "success",
    }
}

fn badge_color(severity: Severity) -> BadgeColor {
    match severity_tone(severity) {
        "danger" => BadgeColor::Danger,
        "warning" => BadgeColor::Warning,
        _ => BadgeColor::Success,
    }
}

#[component]
pub fn SeverityBadge(severity: Severity) -> impl IntoView {
    view! {
        <span class=format!("severity {}", severity.css_class())>
            <Badge appearance=BadgeAppearance::Filled color=badge_color(severity)>
                {severity.as_str()}
            </Badge>
        </span>
    }
}
