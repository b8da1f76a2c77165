//! HTTP-level tests of the REST router using `tower::ServiceExt::oneshot`.

use api_lib::{
    adapters::InMemoryDirectory,
    config::Config,
    web::{build_router, state::AppState},
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn router() -> Router {
    build_router(Arc::new(AppState {
        directory: Arc::new(InMemoryDirectory::with_demo_account()),
        config: Arc::new(Config::default()),
    }))
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn catalog_lists_everything_in_order() {
    let (status, body) = get_json("/catalog").await;
    assert_eq!(status, StatusCode::OK);

    let specialties: Vec<&str> = body["specialties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(specialties, ["general", "pediatria", "dermatologia", "psicologia"]);
    assert_eq!(body["doctors"].as_array().unwrap().len(), 5);
    assert_eq!(body["dates"][0], "15 de Diciembre");
    assert_eq!(body["times"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn doctors_are_filtered_by_specialty() {
    let (status, body) = get_json("/catalog/specialties/general/doctors").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Dra. Ana Martínez", "Dr. Carlos Ruiz"]);
}

#[tokio::test]
async fn unknown_specialty_is_not_found() {
    let (status, _) = get("/catalog/specialties/cardiologia/doctors").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_search_is_case_insensitive() {
    let (status, body) = get_json("/history?q=PARACETAMOL").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["consultations"].as_array().unwrap().len(), 0);
    assert_eq!(body["prescriptions"].as_array().unwrap().len(), 1);

    let (_, body) = get_json("/history").await;
    assert_eq!(body["consultations"].as_array().unwrap().len(), 3);
    assert_eq!(body["prescriptions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = get_json("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/catalog"].is_object());
    assert!(body["paths"]["/history"].is_object());
}
