//! QR code service
//!
//! Registrations carry a signed payload that is rendered as a QR image and
//! checked again when the code is scanned at the venue.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use qrcode::render::svg;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use crate::config::QrConfig;
use crate::utils::errors::{SocioError, Result};

pub const INVALID_QR: &str = "Invalid QR code";

/// Claims embedded in a registration's QR code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrPayload {
    pub registration_id: String,
    pub event_id: String,
    pub participant_email: Option<String>,
    pub issued_at: i64,
}

#[derive(Clone)]
pub struct QrService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    size: u32,
}

impl QrService {
    pub fn new(config: &QrConfig) -> Self {
        // Payloads carry no expiry or audience
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(config.signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_secret.as_bytes()),
            validation,
            size: config.size,
        }
    }

    /// Sign a payload for a registration
    pub fn issue(&self, registration_id: &str, event_id: &str, participant_email: Option<&str>) -> Result<String> {
        let payload = QrPayload {
            registration_id: registration_id.to_string(),
            event_id: event_id.to_string(),
            participant_email: participant_email.map(str::to_string),
            issued_at: Utc::now().timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| SocioError::Qr(e.to_string()))
    }

    /// Check scanned data. Accepts the bare token or a JSON object `{"token": ...}`.
    pub fn verify(&self, data: &str) -> Result<QrPayload> {
        let data = data.trim();
        let token = match serde_json::from_str::<Value>(data) {
            Ok(Value::Object(map)) => map
                .get("token")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| SocioError::InvalidInput(INVALID_QR.to_string()))?,
            Ok(Value::String(token)) => token,
            _ => data.to_string(),
        };

        decode::<QrPayload>(&token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "QR payload rejected");
                SocioError::InvalidInput(INVALID_QR.to_string())
            })
    }

    /// Render data as an SVG QR code wrapped in a data URL
    pub fn render(&self, data: &str) -> Result<String> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| SocioError::Qr(e.to_string()))?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.size, self.size)
            .build();

        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
    }
}
