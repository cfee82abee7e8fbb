//! End-to-end tests against MySQL
//!
//! Each test skips when no database is available. They share one schema, so
//! they run serially and start from empty tables.

mod helpers;

use axum::body::to_bytes;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use serde_json::{json, Value};
use serial_test::serial;

use socio::database::UserRepository;
use socio::models::user::CreateUserRequest;

use helpers::*;

struct Organiser {
    token: String,
    email: String,
}

async fn organiser(db: &TestDatabase) -> Organiser {
    let auth_uuid = random_auth_uuid();
    let email = random_email();
    db.create_test_user(&auth_uuid, &email, true).await;
    Organiser { token: session_token(&auth_uuid, Some(&email)), email }
}

async fn create_event(app: &TestApp, organiser: &Organiser, title: &str) -> String {
    let (status, body) = app
        .multipart(Method::POST, "/api/events", Some(&organiser.token), &event_fields(title), &[])
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["event_id"].as_str().expect("event_id missing").to_string()
}

#[tokio::test]
#[serial]
async fn test_user_sync() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let app = TestApp::with_database(&db);
    let email = random_email();
    let auth_uuid = random_auth_uuid();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "user": { "email": email, "user_metadata": { "full_name": "Ravi Kumar 2341567" } } })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isNew"], true);
    assert_eq!(body["user"]["name"], "Ravi Kumar");
    assert_eq!(body["user"]["register_number"], "2341567");
    assert_eq!(body["user"]["is_organiser"], false);

    let (status, body) = app
        .request(Method::POST, "/api/users", None, Some(json!({ "user": { "id": auth_uuid, "email": email } })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated with auth UUID.");
    assert_eq!(body["user"]["auth_uuid"], auth_uuid.as_str());

    let (status, body) = app
        .request(Method::POST, "/api/users", None, Some(json!({ "user": { "id": auth_uuid, "email": email } })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User already exists.");
    assert_eq!(db.count_records("users").await.unwrap(), 1);

    let (status, body) = app.request(Method::GET, &format!("/api/users/{}", email), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], email.as_str());

    let (status, _) = app.request(Method::GET, "/api/users/nobody@college.edu", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_event_lifecycle_and_ownership() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let app = TestApp::with_database(&db);
    let owner = organiser(&db).await;
    let rival = organiser(&db).await;

    let student_uuid = random_auth_uuid();
    let student_email = random_email();
    db.create_test_user(&student_uuid, &student_email, false).await;
    let student = session_token(&student_uuid, Some(&student_email));

    let (status, body) = app
        .multipart(Method::POST, "/api/events", Some(&student), &event_fields("Hack Night"), &[])
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied: Organiser privileges required");

    let (status, body) = app
        .multipart(
            Method::POST,
            "/api/events",
            Some(&owner.token),
            &event_fields("Hack Night"),
            &[FilePart { field: "imageFile", file_name: "poster.png", content_type: "image/png", bytes: b"png-bytes" }],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created_by"], owner.email.as_str());
    let event_id = body["event_id"].as_str().unwrap().to_string();

    let (status, body) = app.request(Method::GET, &format!("/api/events/{}", event_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let event = &body["event"];
    assert_eq!(event["title"], "Hack Night");
    assert_eq!(event["department_access"], json!(["CSE", "ECE"]));
    assert_eq!(event["tags"], json!(["ai", "robotics"]));
    assert_eq!(event["claims_applicable"], true);
    assert_eq!(event["max_participants"], 3);
    let image_url = event["event_image_url"].as_str().expect("image url missing").to_string();
    let image_path = image_url.trim_start_matches("http://localhost:8000");
    assert_eq!(app.get_bytes(image_path).await.0, StatusCode::OK);

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/events/{}", event_id), Some(&rival.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied: You can only modify your own resources");

    let (status, body) = app
        .multipart(
            Method::PUT,
            &format!("/api/events/{}", event_id),
            Some(&owner.token),
            &[("venue".to_string(), "Block C".to_string())],
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["venue"], "Block C");
    assert_eq!(body["event"]["title"], "Hack Night");

    let (status, body) = app.request(Method::GET, "/api/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().map(Vec::len), Some(1));

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/events/{}", event_id), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");
    assert_eq!(app.get_bytes(image_path).await.0, StatusCode::NOT_FOUND);

    let (status, _) = app.request(Method::GET, &format!("/api/events/{}", event_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_fest_with_events() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let app = TestApp::with_database(&db);
    let owner = organiser(&db).await;

    let (status, body) = app
        .multipart(
            Method::POST,
            "/api/fests",
            Some(&owner.token),
            &[
                ("fest_title".to_string(), "Tech Week".to_string()),
                ("event_heads".to_string(), r#"["Asha","Ravi"]"#.to_string()),
            ],
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let fest_id = body["fest_id"].as_str().expect("fest_id missing").to_string();

    let mut fields = event_fields("Line Follower");
    fields.push(("fest".to_string(), "Tech Week".to_string()));
    let (status, _) = app.multipart(Method::POST, "/api/events", Some(&owner.token), &fields, &[]).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.request(Method::GET, &format!("/api/fests/{}/events", fest_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["title"], "Line Follower");

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/fests/{}", fest_id), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db.count_records("events").await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn test_registration_capacity_and_counter() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let app = TestApp::with_database(&db);
    let owner = organiser(&db).await;
    let event_id = create_event(&app, &owner, "Robo Race").await;

    let (status, body) = app
        .request(Method::POST, "/api/register", None, Some(individual_registration(&event_id)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let solo = body["registration"]["registration_id"].as_str().unwrap().to_string();
    assert_eq!(solo.len(), 32);
    assert_eq!(db.total_participants(&event_id).await, 1);

    let (status, body) = app
        .request(Method::POST, "/api/register", None, Some(team_registration(&event_id, 1)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registration"]["teammates"].as_array().map(Vec::len), Some(1));
    assert_eq!(db.total_participants(&event_id).await, 3);

    let (status, body) = app
        .request(Method::POST, "/api/register", None, Some(individual_registration(&event_id)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Event is full");

    let (status, body) = app
        .request(Method::POST, "/api/register", None, Some(individual_registration("no-such-event")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");

    let (status, body) = app
        .request(Method::GET, &format!("/api/registrations?event_id={}", event_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = app
        .request(Method::GET, &format!("/api/registrations/{}/qr-code", solo), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eventId"], event_id.as_str());
    assert!(body["qrCodeImage"].as_str().unwrap().starts_with("data:image/svg+xml;base64,"));

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/registrations/{}", solo), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db.total_participants(&event_id).await, 2);

    let (status, _) = app.request(Method::GET, &format!("/api/registrations/{}", solo), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_qr_check_in() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let app = TestApp::with_database(&db);
    let owner = organiser(&db).await;
    let event_id = create_event(&app, &owner, "Quiz Finals").await;
    let other_event = create_event(&app, &owner, "Quiz Prelims").await;

    let (_, body) = app
        .request(Method::POST, "/api/register", None, Some(individual_registration(&event_id)))
        .await;
    let registration: Value = body["registration"].clone();
    let qr_data = registration["qr_code_data"].as_str().expect("qr payload missing").to_string();

    let scan_uri = format!("/api/events/{}/scan", event_id);
    let (status, body) = app
        .request(Method::POST, &scan_uri, Some(&owner.token), Some(json!({ "qrData": qr_data })))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["registration_id"], registration["registration_id"]);
    assert_eq!(body["participant"]["name"], registration["individual_name"]);

    // Scanning again keeps a single attended row
    let wrapped = json!({ "token": qr_data }).to_string();
    let (status, _) = app
        .request(Method::POST, &scan_uri, Some(&owner.token), Some(json!({ "qrData": wrapped })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db.count_records("attendance_status").await.unwrap(), 1);

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/events/{}/scan", other_event),
            Some(&owner.token),
            Some(json!({ "qrData": qr_data })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "QR code is for a different event");

    let (status, _) = app
        .request(Method::POST, &scan_uri, Some(&owner.token), Some(json!({ "qrData": "forged" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .request(Method::GET, &format!("/api/events/{}/attendance/stats", event_id), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"], json!({ "total": 1, "attended": 1, "absent": 0, "pending": 0, "attendanceRate": 100.0 }));

    let (status, body) = app
        .request(Method::GET, &format!("/api/events/{}/scan-logs", event_id), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let results: Vec<&str> = body["logs"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|log| log["scan_result"].as_str())
        .collect();
    assert_eq!(results.iter().filter(|r| **r == "success").count(), 2);
    assert!(results.contains(&"invalid"));
}

#[tokio::test]
#[serial]
async fn test_manual_attendance() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let app = TestApp::with_database(&db);
    let owner = organiser(&db).await;
    let rival = organiser(&db).await;
    let event_id = create_event(&app, &owner, "Debate").await;

    for _ in 0..2 {
        app.request(Method::POST, "/api/register", None, Some(individual_registration(&event_id)))
            .await;
    }

    let participants_uri = format!("/api/events/{}/participants", event_id);
    let (status, _) = app.request(Method::GET, &participants_uri, Some(&rival.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request(Method::GET, &participants_uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["title"], "Debate");
    let participants = body["participants"].as_array().unwrap();
    assert!(participants.iter().all(|p| p["attendance_status"] == "absent"));
    let first = participants[0]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/events/{}/attendance", event_id),
            Some(&owner.token),
            Some(json!({ "participantIds": [first, first, "unknown"], "status": "attended" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated_count"], 1);
    assert_eq!(body["message"], "Attendance updated for 1 participants");

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/events/{}/attendance", event_id),
            Some(&owner.token),
            Some(json!({ "participantIds": [first], "status": "late" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Status must be 'attended' or 'absent'");

    let (_, body) = app
        .request(Method::GET, &format!("/api/events/{}/attendance/stats", event_id), Some(&owner.token), None)
        .await;
    assert_eq!(body["stats"]["total"], 2);
    assert_eq!(body["stats"]["attended"], 1);
    assert_eq!(body["stats"]["pending"], 1);
    assert_eq!(body["stats"]["attendanceRate"], 50.0);
}

#[tokio::test]
#[serial]
async fn test_notification_inbox() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let app = TestApp::with_database(&db);
    let owner = organiser(&db).await;
    let reader_email = random_email();
    let reader = session_token(&random_auth_uuid(), Some(&reader_email));

    let (status, _) = app
        .request(
            Method::POST,
            "/api/notifications/bulk",
            Some(&reader),
            Some(json!({ "title": "t", "message": "m", "type": "info", "recipientEmails": [reader_email] })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/notifications/bulk",
            Some(&owner.token),
            Some(json!({
                "title": "Venue changed",
                "message": "Debate moves to Block C",
                "type": "warning",
                "recipientEmails": [reader_email, random_email()],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Successfully created 2 notifications");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/notifications",
            Some(&owner.token),
            Some(json!({ "title": "Reminder", "message": "Starts at 10", "type": "info", "recipientEmail": reader_email })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notification"]["type"], "info");

    let (status, body) = app.request(Method::GET, "/api/notifications", Some(&reader), None).await;
    assert_eq!(status, StatusCode::OK);
    let inbox = body["notifications"].as_array().unwrap();
    assert_eq!(inbox.len(), 2);
    let id = inbox[0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(Method::POST, &format!("/api/notifications/{}/read", id), Some(&reader), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request(Method::POST, "/api/notifications/read-all", Some(&reader), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated_count"], 1);

    // Another user cannot touch the reader's notification
    let (status, _) = app
        .request(Method::DELETE, &format!("/api/notifications/{}", id), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/notifications/{}", id), Some(&reader), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db.count_records("notifications").await.unwrap(), 2);
}

#[tokio::test]
#[serial]
async fn test_duplicate_keys_are_conflicts() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let users = UserRepository::new(db.pool.clone());
    let email = random_email();
    let auth_uuid = random_auth_uuid();
    db.create_test_user(&auth_uuid, &email, false).await;

    let duplicates = [
        CreateUserRequest {
            auth_uuid: None,
            email: email.clone(),
            name: random_name(),
            avatar_url: None,
            register_number: None,
        },
        CreateUserRequest {
            auth_uuid: Some(auth_uuid.clone()),
            email: random_email(),
            name: random_name(),
            avatar_url: None,
            register_number: None,
        },
    ];

    for request in duplicates {
        let err = users.create(request).await.expect_err("duplicate key accepted");
        assert_eq!(err.status_code(), StatusCode::CONFLICT, "{}", err);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Resource already exists");
    }

    assert_eq!(db.count_records("users").await.unwrap(), 1);
}
