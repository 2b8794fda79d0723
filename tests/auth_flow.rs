mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{body_str, TestApp, PASSWORD};

#[tokio::test]
async fn student_registers_then_logs_in() -> Result<()> {
    let t = TestApp::spawn().await?;

    let (status, body) = t
        .post(
            "/auth/register",
            None,
            json!({
                "name": "John Doe",
                "email": "John.Doe@Student.edu",
                "password": PASSWORD,
                "role": "student",
                "department": "Computer Science",
                "year": 2
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["requires_login"], json!(true));
    assert!(body["data"].get("token").is_none(), "registration must not issue a token: {}", body);
    assert_eq!(body["data"]["user"]["email"], json!("john.doe@student.edu"));

    let (status, body) = t.login("john.doe@student.edu", PASSWORD).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let token = body_str(&body, &["data", "token"])?;

    let (status, me) = t.get("/auth/me", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["role"], json!("student"));
    assert_eq!(me["data"]["department"], json!("Computer Science"));

    Ok(())
}

#[tokio::test]
async fn registration_rejects_bad_input() -> Result<()> {
    let t = TestApp::spawn().await?;
    t.student("Jane Smith", "jane@student.edu", "Mechanical").await?;

    let base = json!({
        "name": "Someone Else",
        "email": "someone@student.edu",
        "password": PASSWORD,
        "role": "student",
        "department": "Mechanical",
        "year": 1
    });

    let mut duplicate = base.clone();
    duplicate["email"] = json!("JANE@student.edu");
    let (status, _) = t.post("/auth/register", None, duplicate).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let mut weak = base.clone();
    weak["password"] = json!("password");
    let (status, _) = t.post("/auth/register", None, weak).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut general = base.clone();
    general["department"] = json!("General");
    let (status, _) = t.post("/auth/register", None, general).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut no_year = base.clone();
    if let Some(fields) = no_year.as_object_mut() {
        fields.remove("year");
    }
    let (status, _) = t.post("/auth/register", None, no_year).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut superadmin = base.clone();
    superadmin["role"] = json!("superadmin");
    let (status, _) = t.post("/auth/register", None, superadmin).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn pending_admin_is_told_before_password_is_checked() -> Result<()> {
    let t = TestApp::spawn().await?;
    t.pending_admin("Admin User", "admin@example.com", "Computer Science").await?;

    let (status, body) = t.login("admin@example.com", "WrongPassword1").await?;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);
    assert_eq!(body["error"], json!("pending_approval"));

    let (status, body) = t.login("admin@example.com", PASSWORD).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("pending_approval"));

    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_unauthorized() -> Result<()> {
    let t = TestApp::spawn().await?;
    t.student("John Doe", "john@student.edu", "Computer Science").await?;

    let (status, _) = t.login("john@student.edu", "WrongPassword1").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t.login("nobody@student.edu", PASSWORD).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() -> Result<()> {
    let t = TestApp::spawn().await?;

    let (status, _) = t.request("GET", "/auth/me", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t.get("/auth/me", "not-a-jwt").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn profile_update_ignores_student_fields_for_admins() -> Result<()> {
    let t = TestApp::spawn().await?;
    let (_, student) = t.student("John Doe", "john@student.edu", "Computer Science").await?;
    let (_, admin) = t.admin("Admin User", "admin@example.com", "Computer Science").await?;

    let (status, body) = t
        .put(
            "/auth/profile",
            &student,
            json!({ "year": 3, "skills": [" Rust ", "", "SQL"] }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["year"], json!(3));
    assert_eq!(body["data"]["skills"], json!(["Rust", "SQL"]));

    let (status, body) = t
        .put("/auth/profile", &admin, json!({ "name": "Renamed Admin", "year": 4 }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["name"], json!("Renamed Admin"));
    assert!(body["data"]["year"].is_null());

    let (status, _) = t.put("/auth/profile", &student, json!({ "year": 7 })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}
