//! Request fixtures
//!
//! Random but well-formed payloads built with `fake`.

use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use uuid::Uuid;

pub fn random_email() -> String {
    SafeEmail().fake()
}

pub fn random_name() -> String {
    Name().fake()
}

pub fn random_auth_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Text fields of an event form
pub fn event_fields(title: &str) -> Vec<(String, String)> {
    vec![
        ("title".into(), title.into()),
        ("description".into(), format!("Hosted by {}", CompanyName().fake::<String>())),
        ("event_date".into(), "2025-03-14".into()),
        ("event_time".into(), "10:00".into()),
        ("venue".into(), "Main Auditorium".into()),
        ("category".into(), "technical".into()),
        ("department_access".into(), r#"["CSE","ECE"]"#.into()),
        ("claims_applicable".into(), "true".into()),
        ("registration_fee".into(), "100".into()),
        ("max_participants".into(), "3".into()),
        ("tags".into(), "ai, robotics".into()),
    ]
}

pub fn individual_registration(event_id: &str) -> Value {
    json!({
        "event_id": event_id,
        "registration_type": "individual",
        "individual_name": random_name(),
        "individual_email": random_email(),
        "individual_register_number": "2341567",
    })
}

pub fn team_registration(event_id: &str, teammates: usize) -> Value {
    let mates: Vec<Value> = (0..teammates)
        .map(|i| json!({ "name": random_name(), "email": random_email(), "registerNumber": format!("23{:05}", i) }))
        .collect();

    json!({
        "event_id": event_id,
        "registration_type": "team",
        "team_name": format!("{} crew", CompanyName().fake::<String>()),
        "team_leader_name": random_name(),
        "team_leader_email": random_email(),
        "team_leader_register_number": "2340001",
        "teammates": mates,
    })
}
