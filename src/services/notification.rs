//! Notification service implementation
//!
//! In-app notifications addressed by recipient email. Recipients can read,
//! acknowledge and delete their own notifications; organisers create them,
//! one at a time or in bulk.

use tracing::{info, debug};
use crate::database::repositories::NotificationRepository;
use crate::models::notification::{
    BulkNotificationRequest, CreateNotificationRequest, NewNotification, Notification, NotificationType,
};
use crate::utils::errors::{SocioError, Result};
use crate::utils::helpers::{is_valid_email, non_blank};

pub const INBOX_LIMIT: i64 = 50;
pub const MISSING_FIELDS: &str = "Missing required fields";

/// Notification service for the in-app inbox
#[derive(Clone)]
pub struct NotificationService {
    repository: NotificationRepository,
}

impl NotificationService {
    pub fn new(repository: NotificationRepository) -> Self {
        Self { repository }
    }

    /// Latest notifications for a recipient
    pub async fn inbox(&self, recipient_email: &str) -> Result<Vec<Notification>> {
        debug!(recipient = recipient_email, "Loading notifications");
        self.repository.list_for(recipient_email, INBOX_LIMIT).await
    }

    pub async fn mark_read(&self, id: &str, recipient_email: &str) -> Result<()> {
        if self.repository.mark_read(id, recipient_email).await? {
            Ok(())
        } else {
            Err(SocioError::NotFound("Notification not found".to_string()))
        }
    }

    pub async fn mark_all_read(&self, recipient_email: &str) -> Result<u64> {
        let updated = self.repository.mark_all_read(recipient_email).await?;
        debug!(recipient = recipient_email, updated = updated, "Marked notifications read");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str, recipient_email: &str) -> Result<()> {
        if self.repository.delete(id, recipient_email).await? {
            Ok(())
        } else {
            Err(SocioError::NotFound("Notification not found".to_string()))
        }
    }

    pub async fn create(&self, request: CreateNotificationRequest) -> Result<Notification> {
        let recipient = non_blank(request.recipient_email.clone())
            .ok_or_else(|| SocioError::InvalidInput(MISSING_FIELDS.to_string()))?;
        require_valid_recipient(&recipient)?;
        let notification = build_notification(
            request.title,
            request.message,
            request.notification_type,
            request.event_id,
            request.event_title,
            request.action_url,
        )?;

        let created = self.repository.create(&notification, &recipient).await?;
        info!(notification_id = %created.id, recipient = %recipient, "Notification created");
        Ok(created)
    }

    /// Create one notification per recipient. Returns the number created.
    pub async fn create_bulk(&self, request: BulkNotificationRequest) -> Result<usize> {
        let recipients: Vec<String> = request
            .recipient_emails
            .unwrap_or_default()
            .into_iter()
            .filter_map(|email| non_blank(Some(email)))
            .collect();
        if recipients.is_empty() {
            return Err(SocioError::InvalidInput(MISSING_FIELDS.to_string()));
        }
        recipients.iter().try_for_each(|r| require_valid_recipient(r))?;

        let notification = build_notification(
            request.title,
            request.message,
            request.notification_type,
            request.event_id,
            request.event_title,
            request.action_url,
        )?;

        let created = self.repository.create_bulk(&notification, &recipients).await?;
        info!(count = created, title = %notification.title, "Bulk notifications created");
        Ok(created)
    }
}

fn require_valid_recipient(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(SocioError::InvalidInput(format!("Invalid recipient email: {}", email)))
    }
}

/// Validate the shared notification fields
pub fn build_notification(
    title: Option<String>,
    message: Option<String>,
    notification_type: Option<String>,
    event_id: Option<String>,
    event_title: Option<String>,
    action_url: Option<String>,
) -> Result<NewNotification> {
    let (Some(title), Some(message), Some(kind)) =
        (non_blank(title), non_blank(message), non_blank(notification_type))
    else {
        return Err(SocioError::InvalidInput(MISSING_FIELDS.to_string()));
    };

    let notification_type: NotificationType = kind
        .parse()
        .map_err(|_| SocioError::InvalidInput(format!("Invalid notification type: {}", kind)))?;

    Ok(NewNotification {
        title,
        message,
        notification_type,
        event_id: non_blank(event_id),
        event_title: non_blank(event_title),
        action_url: non_blank(action_url),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_build_notification() {
        let notification = build_notification(
            Some("Venue changed".into()),
            Some("Hackathon moves to Block C".into()),
            Some("warning".into()),
            Some("hackathon-2025".into()),
            Some("".into()),
            None,
        )
        .unwrap();

        assert_eq!(notification.notification_type, NotificationType::Warning);
        assert_eq!(notification.event_id.as_deref(), Some("hackathon-2025"));
        assert_eq!(notification.event_title, None);
    }

    #[test]
    fn test_build_notification_validation() {
        assert_matches!(
            build_notification(Some("t".into()), None, Some("info".into()), None, None, None),
            Err(SocioError::InvalidInput(m)) if m == MISSING_FIELDS
        );
        assert_matches!(
            build_notification(Some("t".into()), Some("m".into()), Some("urgent".into()), None, None, None),
            Err(SocioError::InvalidInput(m)) if m.starts_with("Invalid notification type")
        );
    }

    #[test]
    fn test_recipient_must_look_like_an_email() {
        assert!(require_valid_recipient("asha@college.edu").is_ok());
        assert_matches!(require_valid_recipient("asha"), Err(SocioError::InvalidInput(m)) if m.contains("asha"));
    }
}
