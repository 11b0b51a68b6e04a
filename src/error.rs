use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while loading a model artifact from disk.
///
/// All of these are fatal at startup: the server refuses to bind its
/// listening port without a usable model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported artifact schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// Request-level errors, mapped onto HTTP responses by [`ResponseError`].
///
/// [`ResponseError`]: actix_web::ResponseError
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more required input fields are absent from the payload.
    #[error("Missing required fields")]
    MissingFields,

    /// Anything that goes wrong between payload decoding and inference.
    #[error("{0}")]
    Inference(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl actix_web::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingFields => StatusCode::BAD_REQUEST,
            ServiceError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn missing_fields_is_a_client_error() {
        let err = ServiceError::MissingFields;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[test]
    fn inference_errors_keep_their_message() {
        let err = ServiceError::Inference("field `type` must be a string".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "field `type` must be a string");
    }
}
