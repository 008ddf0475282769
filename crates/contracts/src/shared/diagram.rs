//! Нормализация mermaid-диаграмм из ответа модели.

/// Заголовок по умолчанию, если тип диаграммы не указан
pub const DEFAULT_HEADER: &str = "graph TD";

/// Ключевые слова типа диаграммы (первый токен)
const DIAGRAM_KEYWORDS: &[&str] = &[
    "graph",
    "flowchart",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "gitGraph",
    "mindmap",
    "timeline",
];

/// Снять обрамляющие code fences и гарантировать тип диаграммы в начале.
/// Пустое описание даёт `None`.
///
/// ```
/// use contracts::shared::diagram::normalize_diagram;
/// assert_eq!(normalize_diagram("A-->B").as_deref(), Some("graph TD\nA-->B"));
/// ```
pub fn normalize_diagram(raw: &str) -> Option<String> {
    let body = strip_fences(raw.trim()).trim();
    if body.is_empty() {
        return None;
    }
    if has_diagram_keyword(body) {
        Some(body.to_string())
    } else {
        Some(format!("{}\n{}", DEFAULT_HEADER, body))
    }
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Тег языка после открывающего fence (```mermaid)
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches(|c: char| c.is_alphanumeric()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest)
}

fn has_diagram_keyword(body: &str) -> bool {
    let first = body
        .split(|c: char| c.is_whitespace() || c == ';')
        .next()
        .unwrap_or("");
    DIAGRAM_KEYWORDS.contains(&first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_edges_get_default_header() {
        assert_eq!(
            normalize_diagram("A-->B").as_deref(),
            Some("graph TD\nA-->B")
        );
    }

    #[test]
    fn test_known_keywords_kept() {
        let flow = "flowchart LR\n  A --> B";
        assert_eq!(normalize_diagram(flow).as_deref(), Some(flow));

        let seq = "sequenceDiagram\n  Client->>Server: GET /";
        assert_eq!(normalize_diagram(seq).as_deref(), Some(seq));

        assert_eq!(
            normalize_diagram("graph TD;A-->B").as_deref(),
            Some("graph TD;A-->B")
        );
    }

    #[test]
    fn test_fences_stripped() {
        let fenced = "```mermaid\ngraph TD\n  A[Request] --> B{Timeout?}\n```";
        assert_eq!(
            normalize_diagram(fenced).as_deref(),
            Some("graph TD\n  A[Request] --> B{Timeout?}")
        );

        let plain_fence = "```\nA-->B\n```\n";
        assert_eq!(
            normalize_diagram(plain_fence).as_deref(),
            Some("graph TD\nA-->B")
        );
    }

    #[test]
    fn test_keyword_must_be_whole_token() {
        assert_eq!(
            normalize_diagram("graphite-->B").as_deref(),
            Some("graph TD\ngraphite-->B")
        );
    }

    #[test]
    fn test_empty_description() {
        assert_eq!(normalize_diagram(""), None);
        assert_eq!(normalize_diagram("  \n "), None);
        assert_eq!(normalize_diagram("```mermaid\n```"), None);
    }
}
