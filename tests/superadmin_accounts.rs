mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{body_str, TestApp, PASSWORD, SUPERADMIN_EMAIL};

#[tokio::test]
async fn pending_admins_are_approved_or_removed() -> Result<()> {
    let t = TestApp::spawn().await?;
    let root = t.superadmin_token().await?;
    let keep = t.pending_admin("Keep Admin", "keep@example.com", "Civil").await?;
    let drop = t.pending_admin("Drop Admin", "drop@example.com", "Chemical").await?;

    let (status, body) = t.get("/superadmin/pending-admins", &root).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (status, body) = t
        .put(&format!("/superadmin/approve-admin/{}", keep), &root, json!({}))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["is_approved"], json!(true));

    let (status, _) = t
        .put(&format!("/superadmin/approve-admin/{}", keep), &root, json!({}))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = t
        .request("DELETE", &format!("/superadmin/reject-admin/{}", keep), Some(&root), None)
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = t
        .request("DELETE", &format!("/superadmin/reject-admin/{}", drop), Some(&root), None)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t.login("drop@example.com", PASSWORD).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = t.login("keep@example.com", PASSWORD).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, body) = t.get("/superadmin/pending-admins", &root).await?;
    assert_eq!(body["data"], json!([]));

    Ok(())
}

#[tokio::test]
async fn approval_only_applies_to_admins() -> Result<()> {
    let t = TestApp::spawn().await?;
    let root = t.superadmin_token().await?;
    let (student_id, _) = t.student("John Doe", "john@student.edu", "Computer Science").await?;

    let (status, _) = t
        .put(&format!("/superadmin/approve-admin/{}", student_id), &root, json!({}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .put(&format!("/superadmin/approve-admin/{}", uuid::Uuid::new_v4()), &root, json!({}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn deactivation_revokes_existing_tokens() -> Result<()> {
    let t = TestApp::spawn().await?;
    let root = t.superadmin_token().await?;
    let (student_id, student) = t.student("John Doe", "john@student.edu", "Computer Science").await?;
    let toggle = format!("/superadmin/toggle-user/{}", student_id);

    let (status, body) = t.put(&toggle, &root, json!({})).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["is_active"], json!(false));

    let (status, body) = t.get("/auth/me", &student).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("account_deactivated"));

    let (status, body) = t.login("john@student.edu", PASSWORD).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("account_deactivated"));

    // A wrong password still reads as bad credentials.
    let (status, _) = t.login("john@student.edu", "WrongPassword1").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = t.put(&toggle, &root, json!({})).await?;
    assert_eq!(body["data"]["is_active"], json!(true));
    let (status, _) = t.get("/auth/me", &student).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn superadmin_cannot_be_toggled_and_routes_are_superadmin_only() -> Result<()> {
    let t = TestApp::spawn().await?;
    let root = t.superadmin_token().await?;
    let (_, admin) = t.admin("CS Admin", "cs.admin@example.com", "Computer Science").await?;

    let (_, me) = t.get("/auth/me", &root).await?;
    let root_id = body_str(&me, &["data", "id"])?;
    assert_eq!(me["data"]["email"], json!(SUPERADMIN_EMAIL));

    let (status, _) = t
        .put(&format!("/superadmin/toggle-user/{}", root_id), &root, json!({}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for uri in ["/superadmin/pending-admins", "/superadmin/all-users", "/superadmin/stats"] {
        let (status, _) = t.get(uri, &admin).await?;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} should be superadmin only", uri);
    }

    Ok(())
}

#[tokio::test]
async fn system_stats_and_listings() -> Result<()> {
    let t = TestApp::spawn().await?;
    let root = t.superadmin_token().await?;
    t.student("John Doe", "john@student.edu", "Computer Science").await?;
    t.student("Jane Smith", "jane@student.edu", "Mechanical").await?;
    let (_, cs_admin) = t.admin("CS Admin", "cs.admin@example.com", "Computer Science").await?;
    t.pending_admin("Pending Admin", "pending@example.com", "Civil").await?;

    let (status, body) = t.get("/superadmin/stats", &root).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_users"], json!(5));
    assert_eq!(body["data"]["total_students"], json!(2));
    assert_eq!(body["data"]["total_admins"], json!(1));
    assert_eq!(body["data"]["pending_admins"], json!(1));

    let (_, body) = t.get("/superadmin/all-users?limit=2", &root).await?;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["pagination"]["pages"], json!(3));

    let (status, body) = t.get("/users", &cs_admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], json!(1));
    assert_eq!(body["data"]["items"][0]["name"], json!("John Doe"));

    let (status, body) = t.get("/reports/dashboard", &cs_admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["overview"]["total_students"], json!(1));

    let (_, body) = t.get("/users", &root).await?;
    assert_eq!(body["data"]["pagination"]["total"], json!(2));

    Ok(())
}
