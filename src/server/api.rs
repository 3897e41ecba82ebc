use std::panic::{self, AssertUnwindSafe};

use http_body_util::Full;
use hyper::{
    body::Bytes,
    header::{HeaderValue, CONTENT_TYPE},
    Method, Response, StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    models::{Classifier, Label},
    pipelines::text_classification::{ClassificationResult, ClassifyError, SpamDetector},
};

/// Name reported by the health probe
pub static SERVICE_NAME: &str = "SMS Spam Detector";

/// Version reported by the health probe
pub static SERVICE_VERSION: &str = "1.0";

/// Classification route
pub const PREDICT_PATH: &str = "/api/predict";

/// Health probe route
pub const HEALTH_PATH: &str = "/api/health";

/// Body of a classification request. A missing or null `message` counts as empty.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    /// The raw message to classify
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// `spam` or `ham`
    pub prediction: Label,

    /// Whether the prediction is spam
    pub is_spam: bool,

    /// Percentage in [0, 100] rounded to two decimals, null when unavailable
    pub confidence: Option<f64>,

    /// Always `success`
    pub message: String,

    /// Advice for the reader
    pub recommendation: String,
}

impl From<&ClassificationResult> for PredictResponse {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            prediction: result.label,
            is_spam: result.is_spam(),
            confidence: result.confidence_percent(),
            message: "success".to_string(),
            recommendation: result.recommendation.to_string(),
        }
    }
}

/// Error envelope shared by every failed classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong
    pub error: String,

    /// Always null
    pub prediction: Option<Label>,

    /// Always null
    pub confidence: Option<f64>,
}

impl ErrorResponse {
    /// Build the envelope for `error`
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            prediction: None,
            confidence: None,
        }
    }
}

/// A JSON body together with its status code
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    status: StatusCode,
    body: serde_json::Value,
}

impl JsonResponse {
    /// A 200 response
    pub fn new(body: impl Serialize) -> Self {
        Self {
            status: StatusCode::OK,
            body: serde_json::to_value(body).unwrap_or_else(|err| {
                log::error!("Unable to serialize response body: {err}");

                json!({ "error": "Internal server error" })
            }),
        }
    }

    /// Replace the status code
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// The status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The JSON body
    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Convert into a hyper response
    pub fn into_http_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body.to_string())));

        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        response
    }
}

/// Dispatch a request by method and path
pub fn route<C: Classifier>(
    detector: &SpamDetector<C>,
    method: &Method,
    path: &str,
    body: &[u8],
) -> JsonResponse {
    match (method, path) {
        (&Method::POST, PREDICT_PATH) => predict(detector, body),
        (&Method::GET, HEALTH_PATH) => health(),
        (_, PREDICT_PATH | HEALTH_PATH) => method_not_allowed(),
        _ => not_found(),
    }
}

/// Classify the message in a JSON request body. Panics inside classification are
/// contained here and reported as a 500.
pub fn predict<C: Classifier>(detector: &SpamDetector<C>, body: &[u8]) -> JsonResponse {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PredictRequest::default()
    } else {
        match serde_json::from_slice::<PredictRequest>(body) {
            Ok(request) => request,
            Err(err) => {
                log::debug!("Rejecting malformed request body: {err}");

                return error(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid JSON body: {err}"),
                );
            }
        }
    };

    let message = request.message.unwrap_or_default();

    match panic::catch_unwind(AssertUnwindSafe(|| detector.classify(&message))) {
        Ok(Ok(result)) => {
            log::debug!(
                "Classified {} byte message as {}",
                message.len(),
                result.label
            );

            JsonResponse::new(PredictResponse::from(&result))
        }
        Ok(Err(ClassifyError::EmptyMessage)) => error(
            StatusCode::BAD_REQUEST,
            ClassifyError::EmptyMessage.to_string(),
        ),
        Ok(Err(err)) => {
            log::error!("Classification failed: {err}");

            error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        Err(_) => {
            log::error!("Classification panicked");

            error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Service status
pub fn health() -> JsonResponse {
    JsonResponse::new(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
    }))
}

/// Unknown route
pub fn not_found() -> JsonResponse {
    JsonResponse::new(json!({ "error": "Endpoint not found" })).with_status(StatusCode::NOT_FOUND)
}

/// Known route, wrong method
pub fn method_not_allowed() -> JsonResponse {
    JsonResponse::new(json!({ "error": "Method not allowed" }))
        .with_status(StatusCode::METHOD_NOT_ALLOWED)
}

/// The error envelope with `status`
pub fn error(status: StatusCode, message: impl Into<String>) -> JsonResponse {
    JsonResponse::new(ErrorResponse::new(message)).with_status(status)
}
