//! Извлечение JSON-объекта из свободного ответа модели.
//!
//! Берётся первый объект верхнего уровня со сбалансированными скобками,
//! скобки внутри строковых литералов не считаются. Если объекта нет или он
//! не разбирается, разбирается весь текст целиком. Следующие объекты не
//! рассматриваются.

use serde_json::Value;

/// Первый объект `{ ... }` верхнего уровня
pub fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Разобрать JSON-ответ модели; текст и code fences вокруг допускаются
pub fn extract_json(text: &str) -> Result<Value, String> {
    if let Some(candidate) = first_object_span(text) {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return Ok(value);
        }
    }
    serde_json::from_str::<Value>(text.trim())
        .map_err(|e| format!("Model response is not valid JSON: {}", e))
}
