// HTTP tests for the prediction service, driven through the router with
// tower's oneshot so no socket is bound.

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use hazardscope::model::predict::BatchPredictor;
use hazardscope::model::traits::{HazardClassifier, RawPrediction, SparseVector, TextVectorizer};
use hazardscope::web::{build_router, AppState};

/// Feature 0 is the number of words in the text.
struct WordCount;

impl TextVectorizer for WordCount {
    fn transform(&self, texts: &[String]) -> Vec<SparseVector> {
        texts
            .iter()
            .map(|t| SparseVector {
                entries: vec![(0, t.split_whitespace().count() as f64)],
            })
            .collect()
    }

    fn feature_count(&self) -> usize {
        1
    }
}

/// Word count is the class code.
struct CodeIsWordCount {
    classes: Option<Vec<String>>,
}

impl HazardClassifier for CodeIsWordCount {
    fn predict(&self, rows: &[SparseVector]) -> Vec<RawPrediction> {
        rows.iter()
            .map(|r| RawPrediction::Code(r.entries[0].1 as i64))
            .collect()
    }

    fn classes(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }
}

fn app(classes: Option<&[&str]>) -> axum::Router {
    let classifier = CodeIsWordCount {
        classes: classes.map(|c| c.iter().map(|s| s.to_string()).collect()),
    };
    let predictor = BatchPredictor::new(Arc::new(WordCount), Arc::new(classifier));
    build_router(AppState::new(predictor))
}

async fn post_predict(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================
// POST /predict
// ============================================================

#[tokio::test]
async fn predicts_label_from_bundled_classes() {
    let (status, body) = post_predict(
        app(Some(&["zero", "one", "two"])),
        json!({"description": "water rising"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"predicted_hazard": "two"}));
}

#[tokio::test]
async fn falls_back_to_legacy_table_without_classes() {
    let (status, body) = post_predict(app(None), json!({"description": "huge waves hit the harbor"})).await;
    assert_eq!(status, StatusCode::OK);
    // five words -> code 5 -> "storm surge"
    assert_eq!(body["predicted_hazard"], "storm surge");
}

#[tokio::test]
async fn unknown_code_is_reported_as_unknown() {
    let (_, body) = post_predict(app(Some(&["fire"])), json!({"description": "three word text"})).await;
    assert_eq!(body["predicted_hazard"], "unknown");
}

#[tokio::test]
async fn blank_description_is_rejected() {
    for description in ["", "   \n\t"] {
        let (status, body) = post_predict(app(None), json!({ "description": description })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "Description cannot be empty"}));
    }
}

async fn post_raw(body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn missing_description_gets_json_detail() {
    let (status, body) = post_raw(r#"{"text": "flood"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("description"), "{detail}");
}

#[tokio::test]
async fn malformed_body_gets_json_detail() {
    let (status, body) = post_raw("{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn non_string_description_gets_json_detail() {
    let (status, body) = post_raw(r#"{"description": 42}"#).await;
    assert!(status.is_client_error());
    assert!(body["detail"].is_string());
}

// ============================================================
// GET /health
// ============================================================

#[tokio::test]
async fn health_lists_classes() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app(Some(&["fire", "flood"])).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok", "classes": ["fire", "flood"]}));
}
