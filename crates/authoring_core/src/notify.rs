//! Role-acceptance notifications.
//!
//! # Responsibility
//! - Define the messaging collaborator used by role synchronization.
//! - Compose the request-for-action message sent to new assignees.

use crate::config::join_url;
use crate::model::content::Document;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Subject line of role-acceptance requests.
pub const ROLE_ACCEPTANCE_SUBJECT: &str = "Requesting action on OpenStax CNX content";

/// Messaging failure reported by a `Notifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError(pub String);

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification failed: {}", self.0)
    }
}

impl Error for NotifyError {}

/// Outbound user messaging (accounts service, mail relay, ...).
pub trait Notifier {
    fn send_message(&self, user_id: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn send_message(&self, user_id: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        (**self).send_message(user_id, subject, body)
    }
}

/// Composed notification ready for a `Notifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAcceptanceMessage {
    pub user_id: String,
    pub subject: String,
    pub body: String,
}

impl RoleAcceptanceMessage {
    /// Message asking `assignee` to accept roles `requester` gave them.
    pub fn compose(
        assignee: &str,
        requester: &str,
        document: &Document,
        webview_url: Option<&str>,
    ) -> Self {
        let link_path = format!("users/role-acceptance/{}", document.id);
        let link = match webview_url {
            Some(base) => join_url(base, &link_path),
            None => format!("/{link_path}"),
        };
        let body = format!(
            "Hello {assignee},\n\
             \n\
             {requester} added you to content titled {title}.\n\
             Please go to the following link to accept your roles and license:\n\
             {link}\n\
             \n\
             Thank you from your friends at OpenStax CNX\n",
            title = document.title,
        );
        Self {
            user_id: assignee.to_string(),
            subject: ROLE_ACCEPTANCE_SUBJECT.to_string(),
            body,
        }
    }

    pub fn send(&self, notifier: &impl Notifier) -> Result<(), NotifyError> {
        notifier.send_message(&self.user_id, &self.subject, &self.body)
    }
}
