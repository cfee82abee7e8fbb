//! Registration model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::utils::json_fields::decode_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    Individual,
    Team,
}

impl RegistrationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationType::Individual => "individual",
            RegistrationType::Team => "team",
        }
    }

    /// Head count a registration contributes to the event total
    pub fn participant_count(&self, teammates: &[Value]) -> i32 {
        match self {
            RegistrationType::Individual => 1,
            RegistrationType::Team => teammates.len() as i32 + 1,
        }
    }
}

impl fmt::Display for RegistrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(RegistrationType::Individual),
            "team" => Ok(RegistrationType::Team),
            other => Err(format!("unknown registration type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: String,
    pub registration_id: String,
    pub event_id: String,
    pub user_email: Option<String>,
    pub registration_type: String,
    pub individual_name: Option<String>,
    pub individual_email: Option<String>,
    pub individual_register_number: Option<String>,
    pub team_name: Option<String>,
    pub team_leader_name: Option<String>,
    pub team_leader_email: Option<String>,
    pub team_leader_register_number: Option<String>,
    pub teammates: Option<String>,
    pub qr_code_data: Option<String>,
    pub qr_code_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RegistrationRow {
    pub fn kind(&self) -> RegistrationType {
        self.registration_type.parse().unwrap_or(RegistrationType::Individual)
    }

    pub fn participant_count(&self) -> i32 {
        self.kind().participant_count(&decode_list(self.teammates.as_deref()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    pub registration_id: String,
    pub event_id: String,
    pub user_email: Option<String>,
    pub registration_type: String,
    pub individual_name: Option<String>,
    pub individual_email: Option<String>,
    pub individual_register_number: Option<String>,
    pub team_name: Option<String>,
    pub team_leader_name: Option<String>,
    pub team_leader_email: Option<String>,
    pub team_leader_register_number: Option<String>,
    pub teammates: Vec<Value>,
    pub qr_code_data: Option<String>,
    pub qr_code_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            teammates: decode_list(row.teammates.as_deref()),
            id: row.id,
            registration_id: row.registration_id,
            event_id: row.event_id,
            user_email: row.user_email,
            registration_type: row.registration_type,
            individual_name: row.individual_name,
            individual_email: row.individual_email,
            individual_register_number: row.individual_register_number,
            team_name: row.team_name,
            team_leader_name: row.team_leader_name,
            team_leader_email: row.team_leader_email,
            team_leader_register_number: row.team_leader_register_number,
            qr_code_data: row.qr_code_data,
            qr_code_generated_at: row.qr_code_generated_at,
            created_at: row.created_at,
        }
    }
}

/// Body of `POST /api/register`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub event_id: Option<String>,
    pub user_email: Option<String>,
    pub registration_type: Option<String>,
    pub individual_name: Option<String>,
    pub individual_email: Option<String>,
    pub individual_register_number: Option<String>,
    pub team_name: Option<String>,
    pub team_leader_name: Option<String>,
    pub team_leader_email: Option<String>,
    pub team_leader_register_number: Option<String>,
    pub teammates: Option<Vec<Value>>,
}

/// Validated registration ready to be persisted
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub id: String,
    pub registration_id: String,
    pub event_id: String,
    pub registration_type: RegistrationType,
    pub request: CreateRegistrationRequest,
    pub qr_code_data: String,
    pub participant_count: i32,
}

impl CreateRegistrationRequest {
    /// Email the QR code is issued to
    pub fn participant_email(&self, kind: RegistrationType) -> Option<String> {
        let primary = match kind {
            RegistrationType::Individual => &self.individual_email,
            RegistrationType::Team => &self.team_leader_email,
        };
        primary
            .clone()
            .filter(|e| !e.is_empty())
            .or_else(|| self.user_email.clone().filter(|e| !e.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_participant_count() {
        let mates = vec![json!({"name": "A"}), json!({"name": "B"})];
        assert_eq!(RegistrationType::Individual.participant_count(&mates), 1);
        assert_eq!(RegistrationType::Team.participant_count(&mates), 3);
        assert_eq!(RegistrationType::Team.participant_count(&[]), 1);
    }

    #[test]
    fn test_row_participant_count_tolerates_bad_json() {
        let row = RegistrationRow {
            id: "1".into(),
            registration_id: "r1".into(),
            event_id: "e1".into(),
            user_email: None,
            registration_type: "team".into(),
            individual_name: None,
            individual_email: None,
            individual_register_number: None,
            team_name: Some("Rockets".into()),
            team_leader_name: None,
            team_leader_email: None,
            team_leader_register_number: None,
            teammates: Some("not json".into()),
            qr_code_data: None,
            qr_code_generated_at: None,
            created_at: Utc::now(),
        };
        assert_eq!(row.participant_count(), 1);
    }

    #[test]
    fn test_participant_email_fallback() {
        let request = CreateRegistrationRequest {
            user_email: Some("account@college.edu".into()),
            team_leader_email: Some("lead@college.edu".into()),
            ..Default::default()
        };
        assert_eq!(
            request.participant_email(RegistrationType::Team).as_deref(),
            Some("lead@college.edu")
        );
        assert_eq!(
            request.participant_email(RegistrationType::Individual).as_deref(),
            Some("account@college.edu")
        );
    }

    #[test]
    fn test_registration_type_parse() {
        assert_eq!("team".parse::<RegistrationType>(), Ok(RegistrationType::Team));
        assert!("duo".parse::<RegistrationType>().is_err());
    }
}
