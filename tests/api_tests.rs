/// End-to-end tests against the full router, driven through tower's
/// oneshot without binding a socket.
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use dental_experts::{
    config::{DatabaseConfig, LoggingConfig, ServerConfig, ServiceConfig, UploadConfig},
    context::AppContext,
    db,
    server::build_router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "----clinic-test-boundary";

async fn test_app() -> (Router, AppContext, tempfile::TempDir) {
    let uploads = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        service: ServiceConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            path: ":memory:".into(),
        },
        email: None,
        uploads: UploadConfig {
            directory: uploads.path().to_path_buf(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    };

    let pool = db::memory_pool().await.unwrap();
    let ctx = AppContext::with_pool(config, pool).unwrap();
    (build_router(ctx.clone()), ctx, uploads)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

fn multipart_body(fields: &[(&str, &str)]) -> Body {
    let mut out = String::new();
    for (name, value) in fields {
        out.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    out.push_str(&format!("--{BOUNDARY}--\r\n"));
    Body::from(out)
}

async fn post_multipart(app: &Router, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(multipart_body(fields))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn signup_alice(app: &Router) -> (StatusCode, Value) {
    post_multipart(
        app,
        "/signup",
        &[
            ("name", "Alice"),
            ("email", "alice@example.com"),
            ("password", "secret-pw"),
            ("passwordConfirm", "secret-pw"),
            ("age", "30"),
            ("bloodGroup", "O+"),
            ("gender", "female"),
        ],
    )
    .await
}

#[tokio::test]
async fn signup_then_duplicate_email_fails() {
    let (app, _ctx, _dir) = test_app().await;

    let (status, body) = signup_alice(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Registration successful!");

    let (status, body) = signup_alice(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(
        body["message"],
        "Email already exists. Please use a different email."
    );
}

#[tokio::test]
async fn signup_password_mismatch_fails() {
    let (app, _ctx, _dir) = test_app().await;

    let (_, body) = post_multipart(
        &app,
        "/signup",
        &[
            ("name", "Bob"),
            ("email", "bob@example.com"),
            ("password", "one"),
            ("passwordConfirm", "two"),
        ],
    )
    .await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Passwords do not match");
}

#[tokio::test]
async fn login_roundtrip_and_rejections() {
    let (app, _ctx, _dir) = test_app().await;
    signup_alice(&app).await;

    let (_, body) = post_json(
        &app,
        "/login",
        json!({"type": "user", "email": "alice@example.com", "password": "secret-pw"}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["role"], "user");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let (_, body) = post_json(
        &app,
        "/login",
        json!({"type": "user", "email": "alice@example.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Incorrect password");

    let (_, body) = post_json(
        &app,
        "/login",
        json!({"type": "user", "email": "nobody@example.com", "password": "x"}),
    )
    .await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Email not found. Please sign up first.");
}

#[tokio::test]
async fn admin_login_is_case_insensitive() {
    let (app, ctx, _dir) = test_app().await;
    ctx.admins.seed("clinicadmin", "admin-pw").await.unwrap();

    let (_, body) = post_json(
        &app,
        "/login",
        json!({"type": "admin", "username": "ClinicAdmin", "password": "admin-pw"}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["role"], "admin");

    let (_, body) = post_json(
        &app,
        "/login",
        json!({"type": "admin", "username": "ghost", "password": "admin-pw"}),
    )
    .await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Admin not found");
}

#[tokio::test]
async fn unsupported_method_returns_envelope_not_405() {
    let (app, _ctx, _dir) = test_app().await;

    let (status, body) = get_json(&app, "/signup").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Invalid method");

    let (status, body) = get_json(&app, "/api/update-appointment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Invalid method");
}

async fn book_appointment(app: &Router) -> i64 {
    let (_, body) = post_json(
        app,
        "/appointment",
        json!({
            "name": "Alice",
            "email": "alice@example.com",
            "number": "555-0100",
            "doctor": "Dr. Smith",
            "appointmentDate": "2026-09-15T10:30:00Z"
        }),
    )
    .await;
    assert_eq!(body["status"], "success");

    let (_, body) = get_json(app, "/my-appointments?email=alice@example.com").await;
    body["appointments"][0]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn empty_status_update_persists_scheduled() {
    let (app, _ctx, _dir) = test_app().await;
    let id = book_appointment(&app).await;

    let (_, body) = post_json(
        &app,
        "/api/update-appointment",
        json!({"id": id, "status": "   "}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["updated_data"]["status"], "Scheduled");
}

#[tokio::test]
async fn status_change_notifications_only_for_reschedule_and_complete() {
    let (app, ctx, _dir) = test_app().await;
    let id = book_appointment(&app).await;

    let (_, body) = post_json(
        &app,
        "/api/update-appointment",
        json!({"id": id, "status": "Confirmed"}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(ctx.notifier.enqueued_count(), 0);

    let (_, body) = post_json(
        &app,
        "/api/update-appointment",
        json!({"id": id, "status": "Rescheduled", "date": "2026-09-20T14:00:00Z"}),
    )
    .await;
    assert_eq!(body["updated_data"]["status"], "Rescheduled");
    assert_eq!(ctx.notifier.enqueued_count(), 1);

    let (_, body) = post_json(
        &app,
        "/api/update-appointment",
        json!({"id": id, "status": "Completed"}),
    )
    .await;
    assert_eq!(body["updated_data"]["status"], "Completed");
    assert_eq!(ctx.notifier.enqueued_count(), 2);

    let (_, body) = post_json(
        &app,
        "/api/update-appointment",
        json!({"id": id, "status": "Cancelled"}),
    )
    .await;
    assert_eq!(body["updated_data"]["status"], "Cancelled");
    assert_eq!(ctx.notifier.enqueued_count(), 2);
}

#[tokio::test]
async fn unknown_appointment_update_fails() {
    let (app, _ctx, _dir) = test_app().await;

    let (_, body) = post_json(
        &app,
        "/api/update-appointment",
        json!({"id": 9999, "status": "Confirmed"}),
    )
    .await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Appointment not found");
}

#[tokio::test]
async fn rating_bounds_and_garbage_rejected_without_write() {
    let (app, _ctx, _dir) = test_app().await;

    let submit = |rating: Value| {
        json!({
            "doctor_name": "Dr. Smith",
            "user_email": "alice@example.com",
            "user_name": "Alice",
            "rating": rating,
            "review_text": "Great care"
        })
    };

    let (_, body) = post_json(&app, "/api/submit-rating/", submit(json!(6))).await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Rating must be between 1 and 5");

    let (_, body) = post_json(&app, "/api/submit-rating/", submit(json!("abc"))).await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Invalid rating value");

    let (_, body) = get_json(&app, "/api/get-ratings/").await;
    assert_eq!(body["ratings"].as_array().unwrap().len(), 0);

    let (_, body) = post_json(&app, "/api/submit-rating/", submit(json!("5"))).await;
    assert_eq!(body["status"], "success");

    let (_, body) = get_json(&app, "/api/get-ratings/").await;
    assert_eq!(body["ratings"].as_array().unwrap().len(), 1);
    assert_eq!(body["ratings"][0]["rating"], 5);
}

#[tokio::test]
async fn rating_edits_are_owner_scoped() {
    let (app, _ctx, _dir) = test_app().await;

    let (_, body) = post_json(
        &app,
        "/api/submit-rating/",
        json!({
            "doctor_name": "Dr. Smith",
            "user_email": "alice@example.com",
            "user_name": "Alice",
            "rating": 4,
            "review_text": "Good"
        }),
    )
    .await;
    assert_eq!(body["status"], "success");

    let (_, body) = get_json(&app, "/api/get-ratings/").await;
    let id = body["ratings"][0]["id"].as_i64().unwrap();

    let (_, body) = post_json(
        &app,
        "/api/update-rating/",
        json!({"rating_id": id, "user_email": "mallory@example.com", "rating": 1, "review_text": "bad"}),
    )
    .await;
    assert_eq!(body["status"], "failed");
    assert_eq!(
        body["message"],
        "Rating not found or you do not have permission to edit"
    );

    let (_, body) = post_json(
        &app,
        "/api/delete-rating/",
        json!({"rating_id": id, "user_email": "mallory@example.com"}),
    )
    .await;
    assert_eq!(body["status"], "failed");

    // Admin bypasses the owner check.
    let (_, body) = post_json(
        &app,
        "/api/delete-rating/",
        json!({"rating_id": id, "is_admin": true}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Rating deleted successfully!");
}

#[tokio::test]
async fn contact_form_stores_and_succeeds_without_smtp() {
    let (app, _ctx, _dir) = test_app().await;

    let (_, body) = post_json(
        &app,
        "/contact",
        json!({
            "contactName": "Carol",
            "contactEmail": "carol@example.com",
            "contactNumber": "555-0101",
            "contactMessage": "Do you take walk-ins?"
        }),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Message sent! We checked your inbox for offers.");
}

#[tokio::test]
async fn profile_update_keeps_picture_when_not_resent() {
    let (app, _ctx, _dir) = test_app().await;
    signup_alice(&app).await;

    let (_, body) = post_multipart(
        &app,
        "/update-profile",
        &[
            ("email", "alice@example.com"),
            ("name", "Alice Cooper"),
            ("age", "31"),
        ],
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Profile updated successfully");

    let (_, body) = get_json(&app, "/user-profile?email=alice@example.com").await;
    assert_eq!(body["user"]["name"], "Alice Cooper");
    assert_eq!(body["user"]["age"], 31);
}

#[tokio::test]
async fn dashboard_reports_counts_and_listings() {
    let (app, _ctx, _dir) = test_app().await;
    signup_alice(&app).await;
    book_appointment(&app).await;

    let (_, body) = get_json(&app, "/api/admin-dashboard-data").await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["stats"]["users"], 1);
    assert_eq!(body["stats"]["appointments"], 1);
    assert_eq!(body["stats"]["doctors"], 0);
    assert_eq!(body["users"][0]["email"], "alice@example.com");
    assert_eq!(body["appointments"][0]["doctor"], "Dr. Smith");
}

#[tokio::test]
async fn report_lifecycle_and_pdf_download() {
    let (app, _ctx, _dir) = test_app().await;
    signup_alice(&app).await;

    let (_, body) = post_json(
        &app,
        "/api/manage-report",
        json!({
            "user_email": "alice@example.com",
            "title": "Root Canal Follow-up",
            "doctor_name": "Dr. Smith",
            "report_date": "2026-08-01",
            "diagnosis": "Healing well",
            "advice": "Avoid hard foods for a week"
        }),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Report created successfully");

    let (_, body) = get_json(&app, "/api/get-user-reports?email=alice@example.com").await;
    let id = body["reports"][0]["id"].as_i64().unwrap();

    // The frontend requests the slash-suffixed path; the bare one is an
    // alias. Both must serve the PDF.
    for uri in [
        format!("/download-report/{id}/"),
        format!("/download-report/{id}"),
    ] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("Treatment_Report_Alice.pdf"));
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    let (_, body) = post_json(
        &app,
        "/api/manage-report?action=delete",
        json!({"id": id}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Report deleted");
}

#[tokio::test]
async fn missing_report_pdf_is_plain_404() {
    let (app, _ctx, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/download-report/424242/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Report not found");
}

#[tokio::test]
async fn doctor_management_roundtrip() {
    let (app, _ctx, _dir) = test_app().await;

    let (_, body) = post_multipart(
        &app,
        "/api/manage-doctor",
        &[("name", "Dr. Adams"), ("specialization", "Orthodontics")],
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Doctor added successfully");

    let (_, body) = get_json(&app, "/api/get-doctors").await;
    let id = body["doctors"][0]["id"].as_i64().unwrap();
    assert_eq!(body["doctors"][0]["specialization"], "Orthodontics");

    let (_, body) = get_json(&app, "/api/get-all-doctors").await;
    assert_eq!(body["doctors"], json!([{"name": "Dr. Adams"}]));

    let (_, body) = post_json(
        &app,
        "/api/manage-doctor?action=delete",
        json!({"id": id}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Doctor removed");

    let (_, body) = get_json(&app, "/api/get-doctors").await;
    assert_eq!(body["doctors"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn admin_credentials_rotate_and_rehash() {
    let (app, ctx, _dir) = test_app().await;
    ctx.admins.seed("clinicadmin", "old-pw").await.unwrap();

    let (_, body) = post_json(
        &app,
        "/api/update-admin-credentials",
        json!({"username": "rootadmin", "password": "new-pw"}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Credentials updated. Please login again.");

    let (_, body) = post_json(
        &app,
        "/login",
        json!({"type": "admin", "username": "rootadmin", "password": "new-pw"}),
    )
    .await;
    assert_eq!(body["status"], "success");

    let (_, body) = post_json(
        &app,
        "/login",
        json!({"type": "admin", "username": "clinicadmin", "password": "old-pw"}),
    )
    .await;
    assert_eq!(body["status"], "failed");
}
