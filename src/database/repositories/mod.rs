//! Database repositories module
//! 
//! This module contains all repository implementations for data access

pub mod user;
pub mod event;
pub mod fest;
pub mod registration;
pub mod attendance;
pub mod notification;
pub mod scan_log;

// Re-export repositories
pub use user::UserRepository;
pub use event::EventRepository;
pub use fest::FestRepository;
pub use registration::RegistrationRepository;
pub use attendance::AttendanceRepository;
pub use notification::NotificationRepository;
pub use scan_log::ScanLogRepository;
