use axum::body::{Body, HttpBody};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::format_number;

/// Middleware для логирования HTTP запросов
///
/// Выводит в консоль:
/// - Время (локальное)
/// - Длительность до заголовков ответа (ms)
/// - Размер ответа, если он известен заранее
/// - Статус код
/// - Метод и путь
///
/// Тело ответа не буферизуется: потоковые ответы `/api/chat` уходят клиенту
/// по мере генерации, для них вместо размера печатается `stream`.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();
    let size = describe_size(response.body().size_hint().exact());

    // Голубой для 200, коричневый для остальных
    let color_code = if status == 200 { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        Local::now().format("%H:%M:%S"),
        duration.as_millis(),
        size,
        status,
        method,
        uri.path()
    );

    if status >= 500 {
        tracing::warn!("{} {} -> {}", method, uri.path(), status);
    }

    response
}

fn describe_size(exact: Option<u64>) -> String {
    match exact {
        Some(n) => format_number(n as usize),
        None => "stream".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_column() {
        assert_eq!(describe_size(Some(1234567)), "1.234.567");
        assert_eq!(describe_size(None), "stream");
    }

    #[test]
    fn test_full_body_has_exact_size() {
        let body = Body::from("hello");
        assert_eq!(body.size_hint().exact(), Some(5));
    }
}
