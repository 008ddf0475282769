//! Пословный diff исходного и исправленного фрагмента кода.
//!
//! Токены: слова (идентификаторы), последовательности пробелов и отдельные
//! знаки пунктуации. Изменённый аргумент вызова не помечает всю строку.

use serde::{Deserialize, Serialize};

/// Больше стольких ячеек LCS фрагменты показываются как полная замена
const MAX_LCS_CELLS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiffKind {
    Equal,
    Removed,
    Added,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSegment {
    pub kind: DiffKind,
    pub text: String,
}

/// Левая ("before") и правая ("after") панели двухколоночного diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffPanes {
    pub before: Vec<DiffSegment>,
    pub after: Vec<DiffSegment>,
}

pub fn tokenize(text: &str) -> Vec<&str> {
    #[derive(PartialEq)]
    enum Class {
        Word,
        Space,
        Punct,
    }
    fn class_of(c: char) -> Class {
        if c.is_alphanumeric() || c == '_' {
            Class::Word
        } else if c.is_whitespace() {
            Class::Space
        } else {
            Class::Punct
        }
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<Class> = None;
    for (i, c) in text.char_indices() {
        let class = class_of(c);
        let split = match &current {
            None => false,
            Some(Class::Punct) => true,
            Some(prev) => *prev != class,
        };
        if split {
            tokens.push(&text[start..i]);
            start = i;
        }
        current = Some(class);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Сравнить два текста; соседние сегменты одного вида склеиваются
pub fn word_diff(before: &str, after: &str) -> Vec<DiffSegment> {
    let a = tokenize(before);
    let b = tokenize(after);

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut out = Vec::new();
    push_all(&mut out, DiffKind::Equal, &a[..prefix]);

    let mid_a = &a[prefix..a.len() - suffix];
    let mid_b = &b[prefix..b.len() - suffix];
    if mid_a.len().saturating_mul(mid_b.len()) > MAX_LCS_CELLS {
        push_all(&mut out, DiffKind::Removed, mid_a);
        push_all(&mut out, DiffKind::Added, mid_b);
    } else {
        lcs_diff(&mut out, mid_a, mid_b);
    }

    push_all(&mut out, DiffKind::Equal, &a[a.len() - suffix..]);
    out
}

/// Разложить diff по панелям: удаления слева, добавления справа
pub fn split_panes(segments: &[DiffSegment]) -> DiffPanes {
    let mut panes = DiffPanes::default();
    for seg in segments {
        match seg.kind {
            DiffKind::Equal => {
                panes.before.push(seg.clone());
                panes.after.push(seg.clone());
            }
            DiffKind::Removed => panes.before.push(seg.clone()),
            DiffKind::Added => panes.after.push(seg.clone()),
        }
    }
    panes
}

fn lcs_diff(out: &mut Vec<DiffSegment>, a: &[&str], b: &[&str]) {
    let (n, m) = (a.len(), b.len());
    // table[i][j] = длина LCS для a[i..] и b[j..]
    let mut table = vec![0u32; (n + 1) * (m + 1)];
    let idx = |i: usize, j: usize| i * (m + 1) + j;
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[idx(i, j)] = if a[i] == b[j] {
                table[idx(i + 1, j + 1)] + 1
            } else {
                table[idx(i + 1, j)].max(table[idx(i, j + 1)])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            push(out, DiffKind::Equal, a[i]);
            i += 1;
            j += 1;
        } else if table[idx(i + 1, j)] >= table[idx(i, j + 1)] {
            push(out, DiffKind::Removed, a[i]);
            i += 1;
        } else {
            push(out, DiffKind::Added, b[j]);
            j += 1;
        }
    }
    push_all(out, DiffKind::Removed, &a[i..]);
    push_all(out, DiffKind::Added, &b[j..]);
}

fn push_all(out: &mut Vec<DiffSegment>, kind: DiffKind, tokens: &[&str]) {
    for t in tokens {
        push(out, kind, t);
    }
}

fn push(out: &mut Vec<DiffSegment>, kind: DiffKind, token: &str) {
    if let Some(last) = out.last_mut() {
        if last.kind == kind {
            last.text.push_str(token);
            return;
        }
    }
    out.push(DiffSegment {
        kind,
        text: token.to_string(),
    });
}
