//! HTTP handlers module
//!
//! This module contains the axum handlers grouped by resource:
//! - users, events, fests and registrations
//! - attendance and QR check-in
//! - notifications and uploads

pub mod attendance;
pub mod events;
pub mod fests;
pub mod form;
pub mod health;
pub mod json;
pub mod notifications;
pub mod registrations;
pub mod uploads;
pub mod users;
