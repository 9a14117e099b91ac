//! Creation-time publish permission grants.
//!
//! # Invariants
//! - Additive only: no fetch, no diff, no delete.
//! - One grant per user already accepted in any recognized role; an
//!   assignee holding several accepted roles is granted once.
//! - No grant candidates means no request at all.

use crate::model::content::Document;
use crate::publishing::{PermissionRecord, PublishingClient, PublishingError, PublishingTransport};
use log::{debug, info};
use std::collections::HashSet;

/// ACL declarer facade.
pub struct AclDeclarer<'a, T: PublishingTransport> {
    client: &'a PublishingClient<T>,
}

impl<'a, T: PublishingTransport> AclDeclarer<'a, T> {
    pub fn new(client: &'a PublishingClient<T>) -> Self {
        Self { client }
    }

    /// Grants `publish` to every pre-accepted assignee of a new document.
    ///
    /// Grants are per user, not per assignment: a user accepted in several
    /// roles receives a single `publish` record, since the permission
    /// ledger is keyed by `(uid, permission)`.
    ///
    /// Returns the grants sent. Call once, right after creation.
    ///
    /// # Errors
    /// - `PostFailed` when the permissions POST does not return 202.
    pub fn declare_acl(&self, document: &Document) -> Result<Vec<PermissionRecord>, PublishingError> {
        let mut seen = HashSet::new();
        let mut grants = Vec::new();
        for (_, assignment) in document.metadata.iter() {
            if assignment.has_accepted.is_accepted() && seen.insert(assignment.id.as_str()) {
                grants.push(PermissionRecord::publish(assignment.id.as_str()));
            }
        }

        if grants.is_empty() {
            debug!(
                "event=acl_declare module=service status=skipped content_id={}",
                document.id
            );
            return Ok(grants);
        }

        self.client.post_permissions(document.id, &grants)?;
        info!(
            "event=acl_declare module=service status=ok content_id={} granted={}",
            document.id,
            grants.len()
        );
        Ok(grants)
    }
}
