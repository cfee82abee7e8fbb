//! Multipart form parsing shared by the event and fest handlers

use std::collections::HashMap;

use axum::extract::Multipart;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use crate::services::storage::Upload;
use crate::utils::errors::{SocioError, Result};
use crate::utils::json_fields::{parse_form_list, parse_form_value};

/// Text fields and files of a multipart request
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part for untouched file inputs
                    if bytes.is_empty() && file_name.is_empty() {
                        continue;
                    }
                    form.files.insert(name, Upload { file_name, content_type, bytes: bytes.to_vec() });
                }
                None => {
                    form.fields.insert(name, field.text().await?);
                }
            }
        }

        Ok(form)
    }

    #[cfg(test)]
    pub fn from_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            files: HashMap::new(),
        }
    }

    fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    /// Non-blank text value
    pub fn text(&self, name: &str) -> Option<String> {
        self.raw(name).map(str::to_string)
    }

    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>> {
        self.parse(name, parse_date)
    }

    pub fn time(&self, name: &str) -> Result<Option<NaiveTime>> {
        self.parse(name, parse_time)
    }

    pub fn datetime(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        self.parse(name, parse_datetime)
    }

    pub fn int(&self, name: &str) -> Result<Option<i32>> {
        self.parse(name, |v| v.parse::<i32>().ok())
    }

    pub fn float(&self, name: &str) -> Result<Option<f64>> {
        self.parse(name, |v| v.parse::<f64>().ok().filter(|f| f.is_finite()))
    }

    /// "true" and "1" are true; any other supplied value is false
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.raw(name)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
    }

    /// JSON document, or a comma separated list
    pub fn json(&self, name: &str) -> Option<Value> {
        self.raw(name).map(|v| parse_form_value(Some(v)))
    }

    pub fn list(&self, name: &str) -> Option<Vec<String>> {
        self.raw(name).map(|v| parse_form_list(Some(v)))
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }

    fn parse<T>(&self, name: &str, parser: impl Fn(&str) -> Option<T>) -> Result<Option<T>> {
        match self.raw(name) {
            Some(value) => parser(value)
                .map(Some)
                .ok_or_else(|| SocioError::InvalidInput(format!("Invalid value for {}: {}", name, value))),
            None => Ok(None),
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(value).map(|dt| dt.date_naive()))
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_typed_getters() {
        let form = FormData::from_fields(&[
            ("title", "  Robotics Expo  "),
            ("venue", "   "),
            ("event_date", "2025-03-14"),
            ("event_time", "09:30"),
            ("registration_deadline", "2025-03-10T18:00"),
            ("max_participants", "120"),
            ("registration_fee", "49.5"),
            ("claims_applicable", "1"),
            ("tags", "robots, ai ,"),
            ("rules", r#"{"max_team": 4}"#),
        ]);

        assert_eq!(form.text("title").as_deref(), Some("Robotics Expo"));
        assert_eq!(form.text("venue"), None);
        assert_eq!(form.text("missing"), None);
        assert_eq!(form.date("event_date").unwrap(), NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(form.time("event_time").unwrap(), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(
            form.datetime("registration_deadline").unwrap().map(|d| d.to_rfc3339()),
            Some("2025-03-10T18:00:00+00:00".to_string())
        );
        assert_eq!(form.int("max_participants").unwrap(), Some(120));
        assert_eq!(form.float("registration_fee").unwrap(), Some(49.5));
        assert_eq!(form.flag("claims_applicable"), Some(true));
        assert_eq!(form.list("tags"), Some(vec!["robots".to_string(), "ai".to_string()]));
        assert_eq!(form.json("rules"), Some(json!({"max_team": 4})));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let form = FormData::from_fields(&[
            ("max_participants", "lots"),
            ("event_date", "14/03/2025"),
            ("claims_applicable", "yes"),
        ]);

        assert_matches!(form.int("max_participants"), Err(SocioError::InvalidInput(m)) if m.contains("max_participants"));
        assert_matches!(form.date("event_date"), Err(SocioError::InvalidInput(_)));
        assert_eq!(form.flag("claims_applicable"), Some(false));
    }
}
