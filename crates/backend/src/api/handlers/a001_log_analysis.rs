use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;

use crate::domain::a001_log_analysis::service::{self, AnalysisError};
use crate::shared::config::Config;
use contracts::domain::a001_log_analysis::{AnalyzeRequest, ErrorResponse, LogAnalysis};

/// Общее состояние HTTP-слоя
pub type AppState = Arc<Config>;

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AnalysisError::MissingCredential(env_name) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Missing API key")
                    .with_details(format!("Set the {} environment variable", env_name)),
            ),
            AnalysisError::InvalidRequest(reason) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(reason.clone()))
            }
            AnalysisError::Gateway(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("All models failed").with_details(e.to_string()),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// POST /api/analyze
pub async fn analyze(
    State(config): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<LogAnalysis>, AnalysisError> {
    let gateway = service::build_gateway(&config.llm).map_err(|e| {
        tracing::error!("Analyze rejected: {}", e);
        e
    })?;

    match service::analyze(&gateway, &request).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            tracing::error!("Analyze failed: {}", e);
            Err(e)
        }
    }
}

/// POST /api/chat
///
/// Ответ: сырой текст, фрагменты пересылаются по мере поступления.
pub async fn chat(
    State(config): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, AnalysisError> {
    let gateway = service::build_gateway(&config.llm)?;
    let outcome = service::stream_chat(&gateway, &request).await.map_err(|e| {
        tracing::error!("Chat failed: {}", e);
        e
    })?;

    let model = outcome.model;
    let body = outcome.value.map(move |chunk| {
        if let Err(e) = &chunk {
            // Заголовки уже отправлены: поток просто обрывается
            tracing::warn!("Stream from {} aborted: {}", model, e);
        }
        chunk
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}
