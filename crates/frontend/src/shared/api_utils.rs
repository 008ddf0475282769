//! API utilities for frontend-backend communication

use contracts::domain::a001_log_analysis::ErrorResponse;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server (trunk serves the UI elsewhere
/// during development; in production the backend serves both).
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/analyze");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Message for a non-2xx response: `{ error, details }` body if present, else the status
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => err.message(),
        Err(_) if !body.trim().is_empty() => format!("HTTP {}: {}", status, body.trim()),
        Err(_) => format!("HTTP {}", status),
    }
}
