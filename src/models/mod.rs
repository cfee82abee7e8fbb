//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod event;
pub mod fest;
pub mod registration;
pub mod attendance;
pub mod notification;

// Re-export commonly used models
pub use user::{User, CreateUserRequest, AuthClientUser, SyncUserRequest};
pub use event::{Event, EventRow, EventDetails, EventAssets, CreateEventRequest};
pub use fest::{Fest, FestRow, FestDetails, CreateFestRequest};
pub use registration::{Registration, RegistrationRow, RegistrationType, CreateRegistrationRequest, NewRegistration};
pub use attendance::{AttendanceStatus, AttendanceStats, Participant, ParticipantRow, MarkAttendanceRequest, ScanRequest, ScanLog, ScanResult};
pub use notification::{Notification, NotificationType, CreateNotificationRequest, BulkNotificationRequest, NewNotification};
