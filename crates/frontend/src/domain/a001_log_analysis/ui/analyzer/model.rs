//! Log Analysis - Model (API functions)

use crate::shared::api_utils::{api_url, error_message};
use contracts::domain::a001_log_analysis::{AnalysisMode, AnalyzeRequest, LogAnalysis};

/// Структурированный анализ.
///
/// Возвращает проверенный результат и сырой JSON для истории.
pub async fn analyze(request: &AnalyzeRequest) -> Result<(LogAnalysis, String), String> {
    let url = api_url(AnalysisMode::Structured.endpoint());
    let response = gloo_net::http::Request::post(&url)
        .json(request)
        .map_err(|e| format!("{e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| format!("{e}"))?;
    if !response.ok() {
        return Err(error_message(status, &text));
    }

    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("Invalid response: {e}"))?;
    let analysis =
        LogAnalysis::from_value(&value).map_err(|e| format!("Malformed result: {e}"))?;
    Ok((analysis, text))
}

/// Обычный режим: читает поток `/api/chat` и отдаёт текст фрагментами.
///
/// Возвращает весь полученный markdown.
pub async fn stream_chat<F>(request: &AnalyzeRequest, mut on_chunk: F) -> Result<String, String>
where
    F: FnMut(&str),
{
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{ReadableStreamDefaultReader, Request, RequestInit, RequestMode, Response};

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    let body = serde_json::to_string(request).map_err(|e| format!("{e}"))?;
    opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

    let url = api_url(AnalysisMode::Normal.endpoint());
    let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| format!("{e:?}"))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| format!("{e:?}"))?;

    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("Network error: {e:?}"))?;
    let resp: Response = resp_value.dyn_into().map_err(|e| format!("{e:?}"))?;

    if !resp.ok() {
        let text = JsFuture::from(resp.text().map_err(|e| format!("{e:?}"))?)
            .await
            .ok()
            .and_then(|t| t.as_string())
            .unwrap_or_default();
        return Err(error_message(resp.status(), &text));
    }

    let stream = resp
        .body()
        .ok_or_else(|| "Empty response body".to_string())?;
    let reader: ReadableStreamDefaultReader = stream.get_reader().unchecked_into();

    let mut decoder = Utf8Carry::default();
    let mut full = String::new();
    let mut emit = |text: String, full: &mut String| {
        if !text.is_empty() {
            on_chunk(&text);
            full.push_str(&text);
        }
    };

    loop {
        let chunk = JsFuture::from(reader.read())
            .await
            .map_err(|e| format!("Stream interrupted: {e:?}"))?;
        let done = js_sys::Reflect::get(&chunk, &"done".into())
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if done {
            break;
        }
        let value = js_sys::Reflect::get(&chunk, &"value".into())
            .map_err(|e| format!("{e:?}"))?;
        let bytes = js_sys::Uint8Array::new(&value).to_vec();
        emit(decoder.push(&bytes), &mut full);
    }
    emit(decoder.finish(), &mut full);

    if full.trim().is_empty() {
        return Err("The model returned an empty answer".to_string());
    }
    Ok(full)
}

/// Декодер UTF-8 для потока: хвост неполного символа ждёт следующий фрагмент
#[derive(Debug, Default)]
pub struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                text
            }
            // Неполная последовательность в конце: отдаём валидную часть
            Err(e) if e.error_len().is_none() => {
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                text
            }
            Err(_) => {
                let text = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                text
            }
        }
    }

    pub fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}
