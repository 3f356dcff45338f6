//! HTTP-facing errors and rejection recovery
//!
//! Every error response carries a JSON body of the form `{"detail": "..."}`.

use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::models::ErrorResponse;

pub const EMPTY_MESSAGE: &str = "A mensagem não pode ser vazia.";
pub const CHAT_UNAVAILABLE: &str = "Desculpe, o chatbot não está disponível no momento.";
pub const CHAT_FAILED: &str = "Desculpe, não foi possível obter uma resposta agora.";
pub const INVALID_EMAIL: &str = "Endereço de e-mail inválido.";
pub const LEAD_NOT_SAVED: &str = "Falha ao salvar o lead.";
pub const PAGE_FAILED: &str = "Falha ao carregar a página.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad input from the client
    #[error("{0}")]
    Validation(String),

    /// Chat route running in degraded mode
    #[error("{0}")]
    Unavailable(String),

    /// Downstream failure (model call, file write, template)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Reply for ApiError {
    fn into_response(self) -> Response {
        error_reply(self.status(), self.to_string())
    }
}

fn error_reply(status: StatusCode, detail: impl Into<String>) -> Response {
    let body = ErrorResponse {
        detail: detail.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

/// Turn framework rejections into `{detail}` responses
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.is_not_found() {
        return Ok(error_reply(StatusCode::NOT_FOUND, "Not Found"));
    }
    if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        warn!(error = %e, "rejected malformed request body");
        return Ok(error_reply(StatusCode::BAD_REQUEST, e.to_string()));
    }
    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(error_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type",
        ));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"));
    }

    warn!(rejection = ?err, "unhandled rejection");
    Ok(error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation(EMPTY_MESSAGE.to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unavailable(CHAT_UNAVAILABLE.to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal(LEAD_NOT_SAVED.to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_is_json() {
        let response = ApiError::Validation(EMPTY_MESSAGE.to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_handle_not_found() {
        let response = handle_rejection(warp::reject::not_found()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
