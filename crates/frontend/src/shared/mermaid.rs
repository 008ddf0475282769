//! Обёртка над mermaid.js (подключается в index.html, см. `window.renderMermaid`)

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// JS binding: `renderMermaid(id, source) -> Promise<string /* svg */>`
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = renderMermaid, catch)]
    fn render_mermaid_js(id: &str, source: &str) -> Result<js_sys::Promise, JsValue>;
}

static DIAGRAM_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Уникальный id для очередного рендера (mermaid требует его для временного узла)
pub fn next_diagram_id() -> String {
    format!(
        "log-doctor-diagram-{}",
        DIAGRAM_COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

/// Отрендерить исходник диаграммы в SVG-разметку
pub async fn render_mermaid(id: &str, source: &str) -> Result<String, String> {
    let promise = render_mermaid_js(id, source).map_err(js_error_message)?;
    let svg = JsFuture::from(promise).await.map_err(js_error_message)?;
    svg.as_string()
        .ok_or_else(|| "Diagram renderer returned no SVG".to_string())
}

fn js_error_message(e: JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    js_sys::Reflect::get(&e, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", e))
}

/// Защита асинхронного рендера.
///
/// `alive` сбрасывается при размонтировании, `generation` растёт с каждым
/// новым исходником. Результат применяется, только если компонент жив и
/// за время рендера не начался более новый.
#[derive(Debug, Clone)]
pub struct RenderGuard {
    alive: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl Default for RenderGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderGuard {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Начать новый рендер; предыдущие становятся устаревшими
    pub fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.alive.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == ticket
    }

    pub fn cancel(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
