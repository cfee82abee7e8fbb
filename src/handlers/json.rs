//! JSON body extractor

use axum::extract::FromRequest;
use crate::utils::errors::SocioError;

/// `axum::Json` that reports malformed bodies as a 400 `{"error": ...}`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(SocioError))]
pub struct ApiJson<T>(pub T);
