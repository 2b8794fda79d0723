mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::Value;

use common::TestApp;

#[tokio::test]
async fn health_endpoint_reports_db_ok() -> Result<()> {
    let t = TestApp::spawn().await?;

    let (status, body) = t.request("GET", "/api/health", None, None).await?;
    assert_eq!(status, StatusCode::OK, "health endpoint did not return 200");
    assert_eq!(body.get("status").and_then(Value::as_str), Some("ok"));
    assert_eq!(body.get("db_ok").and_then(Value::as_bool), Some(true), "got: {}", body);

    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let t = TestApp::spawn().await?;

    let (status, body) = t.request("GET", "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);

    let paths = body.get("paths").and_then(Value::as_object).expect("paths object");
    for path in ["/auth/login", "/achievements", "/achievements/{id}/status", "/superadmin/approve-admin/{id}"] {
        assert!(paths.contains_key(path), "OpenAPI missing path {}", path);
    }

    let props = body
        .pointer("/components/schemas/Achievement/properties")
        .and_then(Value::as_object)
        .expect("components.schemas.Achievement.properties must exist");
    for key in ["status", "remarks", "approved_by", "approved_at"] {
        assert!(props.contains_key(key), "Achievement schema missing '{}'", key);
    }

    Ok(())
}
