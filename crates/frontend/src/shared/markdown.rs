//! Небольшой markdown-рендерер для ответа обычного режима.
//!
//! Поддерживается: заголовки `#`..`######`, абзацы, списки (`-`, `*`, `1.`),
//! блоки кода в ``` с подсветкой ключевых слов, `inline code` и `**bold**`.
//! Весь текст экранируется. Незакрытый блок кода (ответ ещё идёт) выводится
//! как код до конца текста.

const CODE_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "def", "else",
    "enum", "except", "export", "false", "False", "finally", "fn", "for", "from", "func",
    "function", "if", "impl", "import", "in", "interface", "let", "loop", "match", "mod",
    "mut", "new", "nil", "None", "null", "private", "pub", "public", "raise", "return",
    "self", "static", "struct", "switch", "this", "throw", "trait", "true", "True", "try",
    "type", "use", "var", "void", "while", "with", "yield",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

struct Renderer<'a> {
    html: String,
    paragraph: Vec<&'a str>,
    list: Option<ListKind>,
}

impl<'a> Renderer<'a> {
    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join(" ");
        self.paragraph.clear();
        self.html.push_str("<p>");
        self.html.push_str(&render_inline(&text));
        self.html.push_str("</p>");
    }

    fn close_list(&mut self) {
        if let Some(kind) = self.list.take() {
            self.html.push_str(&format!("</{}>", kind.tag()));
        }
    }

    fn flush_blocks(&mut self) {
        self.flush_paragraph();
        self.close_list();
    }

    fn push_code_block(&mut self, lang: &str, lines: &[&str]) {
        let lang: String = lang
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
            .collect();
        if lang.is_empty() {
            self.html.push_str("<pre class=\"md-code\"><code>");
        } else {
            self.html.push_str(&format!(
                "<pre class=\"md-code\"><code class=\"language-{}\">",
                lang
            ));
        }
        self.html.push_str(&highlight_code(&lines.join("\n")));
        self.html.push_str("</code></pre>");
    }
}

/// Markdown → HTML
pub fn render_markdown(source: &str) -> String {
    let mut r = Renderer {
        html: String::with_capacity(source.len() * 2),
        paragraph: Vec::new(),
        list: None,
    };
    let mut code: Option<(&str, Vec<&str>)> = None;

    for line in source.lines() {
        let trimmed = line.trim();

        if code.is_some() {
            if trimmed.starts_with("```") {
                if let Some((lang, lines)) = code.take() {
                    r.push_code_block(lang, &lines);
                }
            } else if let Some((_, lines)) = code.as_mut() {
                lines.push(line);
            }
            continue;
        }

        if let Some(lang) = trimmed.strip_prefix("```") {
            r.flush_blocks();
            code = Some((lang.trim(), Vec::new()));
            continue;
        }

        if trimmed.is_empty() {
            r.flush_blocks();
            continue;
        }

        if let Some((level, text)) = heading(trimmed) {
            r.flush_blocks();
            r.html
                .push_str(&format!("<h{0}>{1}</h{0}>", level, render_inline(text)));
            continue;
        }

        if let Some((kind, item)) = list_item(trimmed) {
            r.flush_paragraph();
            if r.list != Some(kind) {
                r.close_list();
                r.html.push_str(&format!("<{}>", kind.tag()));
                r.list = Some(kind);
            }
            r.html.push_str("<li>");
            r.html.push_str(&render_inline(item));
            r.html.push_str("</li>");
            continue;
        }

        r.close_list();
        r.paragraph.push(trimmed);
    }

    if let Some((lang, lines)) = code.take() {
        r.push_code_block(lang, &lines);
    }
    r.flush_blocks();
    r.html
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    line[level..].strip_prefix(' ').map(|text| (level, text.trim()))
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some((ListKind::Unordered, item));
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(item) = line[digits..].strip_prefix(". ") {
            return Some((ListKind::Ordered, item));
        }
    }
    None
}

/// `inline code` и **bold**; непарные маркеры остаются текстом
fn render_inline(text: &str) -> String {
    let parts: Vec<&str> = text.split('`').collect();
    let last = parts.len() - 1;
    let mut out = String::with_capacity(text.len());
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 0 {
            out.push_str(&render_bold(&escape_html(part)));
        } else if i == last {
            out.push('`');
            out.push_str(&render_bold(&escape_html(part)));
        } else {
            out.push_str("<code>");
            out.push_str(&escape_html(part));
            out.push_str("</code>");
        }
    }
    out
}

fn render_bold(escaped: &str) -> String {
    let parts: Vec<&str> = escaped.split("**").collect();
    let last = parts.len() - 1;
    let mut out = String::with_capacity(escaped.len());
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 0 {
            out.push_str(part);
        } else if i == last {
            out.push_str("**");
            out.push_str(part);
        } else {
            out.push_str("<strong>");
            out.push_str(part);
            out.push_str("</strong>");
        }
    }
    out
}

fn highlight_code(code: &str) -> String {
    let mut out = String::with_capacity(code.len() * 2);
    let mut word = String::new();
    for ch in code.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            word.push(ch);
            continue;
        }
        flush_word(&mut out, &mut word);
        push_escaped(&mut out, ch);
    }
    flush_word(&mut out, &mut word);
    out
}

fn flush_word(out: &mut String, word: &mut String) {
    if word.is_empty() {
        return;
    }
    if CODE_KEYWORDS.contains(&word.as_str()) {
        out.push_str("<span class=\"md-kw\">");
        out.push_str(word);
        out.push_str("</span>");
    } else {
        out.push_str(word);
    }
    word.clear();
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(ch),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped(&mut out, ch);
    }
    out
}
