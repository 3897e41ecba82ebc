mod common;

use hyper::{header::CONTENT_TYPE, Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sms_spam_detector::{
    models::{Classifier, ClassifierError, FeatureVector, Label},
    pipelines::text_classification::{SpamDetector, HAM_RECOMMENDATION, SPAM_RECOMMENDATION},
    server::api::{self, JsonResponse},
};

use common::{detector, HAM_SCENARIO, SPAM_SCENARIO};

fn post<C: Classifier>(detector: &SpamDetector<C>, body: &str) -> JsonResponse {
    api::route(detector, &Method::POST, "/api/predict", body.as_bytes())
}

fn no_message() -> Value {
    json!({ "error": "No message provided", "prediction": null, "confidence": null })
}

/// Panics on every call
struct Exploding(usize);

impl Classifier for Exploding {
    fn n_features(&self) -> usize {
        self.0
    }

    fn predict(&self, _features: &FeatureVector) -> Result<Label, ClassifierError> {
        panic!("model exploded")
    }

    fn predict_proba(
        &self,
        _features: &FeatureVector,
    ) -> Result<sms_spam_detector::models::Probabilities, ClassifierError> {
        panic!("model exploded")
    }
}

/// Produces labels but no probabilities
struct Hard(usize);

impl Classifier for Hard {
    fn n_features(&self) -> usize {
        self.0
    }

    fn predict(&self, _features: &FeatureVector) -> Result<Label, ClassifierError> {
        Ok(Label::Ham)
    }
}

#[test]
fn test_predict_spam() {
    let response = post(&detector(), &json!({ "message": SPAM_SCENARIO }).to_string());
    let body = response.body();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["prediction"], "spam");
    assert_eq!(body["is_spam"], true);
    assert_eq!(body["message"], "success");
    assert_eq!(body["recommendation"], SPAM_RECOMMENDATION);

    let confidence = body["confidence"].as_f64().unwrap();
    assert!(confidence > 50.0 && confidence <= 100.0);
    assert_eq!((confidence * 100.0).round() / 100.0, confidence);
}

#[test]
fn test_predict_ham() {
    let response = post(&detector(), &json!({ "message": HAM_SCENARIO }).to_string());
    let body = response.body();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["prediction"], "ham");
    assert_eq!(body["is_spam"], false);
    assert_eq!(body["recommendation"], HAM_RECOMMENDATION);
}

#[test]
fn test_predict_empty_message() {
    let detector = detector();

    for body in [
        r#"{"message": ""}"#,
        r#"{"message": "   \n"}"#,
        r#"{"message": null}"#,
        r#"{}"#,
        "",
    ] {
        let response = post(&detector, body);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(response.body(), &no_message());
    }
}

#[test]
fn test_predict_malformed_json() {
    let response = post(&detector(), "{not json");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.body()["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
    assert_eq!(response.body()["prediction"], Value::Null);
    assert_eq!(response.body()["confidence"], Value::Null);
}

#[test]
fn test_predict_contains_panics() {
    let vectorizer = detector().vectorizer().clone();
    let n_features = vectorizer.vocabulary_len();
    let detector = SpamDetector::new(vectorizer, Exploding(n_features)).unwrap();

    let response = post(&detector, r#"{"message": "hello there"}"#);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body(),
        &json!({ "error": "Internal server error", "prediction": null, "confidence": null })
    );

    // still serving
    let response = api::route(&detector, &Method::GET, "/api/health", b"");
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_predict_without_probabilities() {
    let vectorizer = detector().vectorizer().clone();
    let n_features = vectorizer.vocabulary_len();
    let detector = SpamDetector::new(vectorizer, Hard(n_features)).unwrap();

    let response = post(&detector, r#"{"message": "hello there"}"#);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body()["prediction"], "ham");
    assert_eq!(response.body()["confidence"], Value::Null);
}

/// Labels spam, fails to produce probabilities
struct Unsure(usize);

impl Classifier for Unsure {
    fn n_features(&self) -> usize {
        self.0
    }

    fn predict(&self, _features: &FeatureVector) -> Result<Label, ClassifierError> {
        Ok(Label::Spam)
    }

    fn predict_proba(
        &self,
        _features: &FeatureVector,
    ) -> Result<sms_spam_detector::models::Probabilities, ClassifierError> {
        Err(ClassifierError::InvalidAlpha(f64::NAN))
    }
}

#[test]
fn test_predict_when_probabilities_fail() {
    let vectorizer = detector().vectorizer().clone();
    let n_features = vectorizer.vocabulary_len();
    let detector = SpamDetector::new(vectorizer, Unsure(n_features)).unwrap();

    let response = post(&detector, r#"{"message": "free prize"}"#);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body()["prediction"], "spam");
    assert_eq!(response.body()["is_spam"], true);
    assert_eq!(response.body()["confidence"], Value::Null);
}

#[test]
fn test_health() {
    let response = api::route(&detector(), &Method::GET, "/api/health", b"");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.body(),
        &json!({ "status": "healthy", "service": "SMS Spam Detector", "version": "1.0" })
    );
}

#[test]
fn test_unknown_route_and_method() {
    let detector = detector();

    let response = api::route(&detector, &Method::GET, "/nope", b"");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.body(), &json!({ "error": "Endpoint not found" }));

    let response = api::route(&detector, &Method::GET, "/api/predict", b"");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = api::route(&detector, &Method::POST, "/api/health", b"");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_http_response_is_json() {
    let response = api::not_found().into_http_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
}
