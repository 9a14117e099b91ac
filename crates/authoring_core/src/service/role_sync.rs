//! Role ledger reconciliation.
//!
//! # Responsibility
//! - Diff local role assignments against the publishing role ledger.
//! - Delete remote-only entries, then post the full local list.
//! - Backfill provenance on every recognized assignment lacking it.
//! - Notify newly added assignees.
//!
//! # Invariants
//! - A failed fetch aborts before any local or remote mutation.
//! - An empty removal set never issues a DELETE.
//! - The POST carries every recognized local assignment, not a delta.
//! - Local accepted/rejected state and existing provenance are never
//!   overwritten; a pending local state adopts a decided remote state.
//! - Unrecognized role kinds are neither deleted, posted nor stamped.

use crate::model::acceptance::Acceptance;
use crate::model::content::Document;
use crate::notify::{Notifier, RoleAcceptanceMessage};
use crate::publishing::{PublishingClient, PublishingError, PublishingTransport, RemoteRoleRecord, RoleKey};
use crate::service::Clock;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Outcome of one successful role synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleSyncReport {
    /// Remote entries deleted, in remote order.
    pub removed: Vec<RoleKey>,
    /// Local entries absent from the remote ledger, in local order.
    pub added: Vec<RoleKey>,
    /// Full list sent by the POST.
    pub posted: Vec<RemoteRoleRecord>,
    /// Assignees a notification was successfully sent to.
    pub notified: Vec<String>,
}

/// Role synchronizer facade.
pub struct RoleSynchronizer<'a, T: PublishingTransport, N: Notifier, C: Clock> {
    client: &'a PublishingClient<T>,
    notifier: N,
    clock: C,
}

impl<'a, T: PublishingTransport, N: Notifier, C: Clock> RoleSynchronizer<'a, T, N, C> {
    pub fn new(client: &'a PublishingClient<T>, notifier: N, clock: C) -> Self {
        Self {
            client,
            notifier,
            clock,
        }
    }

    /// Reconciles `document`'s roles with the publishing ledger.
    ///
    /// `principal` is the authenticated user performing the edit. The
    /// document is mutated in place (provenance, adopted acceptance) and
    /// must be persisted by the caller afterwards.
    ///
    /// # Errors
    /// - `FetchFailed` when the ledger GET does not return 200.
    /// - `DeleteFailed` when the DELETE does not return 200; no POST follows.
    /// - `PostFailed` when the POST does not return 202.
    pub fn declare_roles(
        &self,
        document: &mut Document,
        principal: &str,
    ) -> Result<RoleSyncReport, PublishingError> {
        let started_at = Instant::now();
        let content_id = document.id;
        info!("event=role_sync module=service status=start content_id={content_id}");

        let remote_records = self.client.fetch_roles(content_id)?;
        let remote_acceptance: HashMap<RoleKey, Acceptance> = remote_records
            .iter()
            .map(|record| (record.key(), record.has_accepted))
            .collect();

        let local_keys: HashSet<RoleKey> = document
            .metadata
            .iter()
            .map(|(kind, assignment)| RoleKey {
                uid: assignment.id.clone(),
                role: kind.wire_name().to_string(),
            })
            .collect();

        let removed = removal_set(&remote_records, &local_keys);
        if removed.is_empty() {
            debug!("event=role_sync_delete module=service status=skipped content_id={content_id}");
        } else {
            self.client.delete_roles(content_id, &removed)?;
        }

        let now = self.clock.now();
        let mut added = Vec::new();
        let mut adopted = 0usize;
        for (kind, assignment) in document.metadata.iter_mut() {
            let key = RoleKey {
                uid: assignment.id.clone(),
                role: kind.wire_name().to_string(),
            };
            if !assignment.has_provenance() {
                assignment.assignment_date = Some(now);
                assignment.requester = Some(principal.to_string());
            }
            match remote_acceptance.get(&key) {
                Some(remote) => {
                    if assignment.has_accepted.is_pending() && !remote.is_pending() {
                        assignment.has_accepted = *remote;
                        adopted += 1;
                    }
                }
                None => added.push(key),
            }
        }

        let notified = self.notify_added(document, &added, principal);

        let posted: Vec<RemoteRoleRecord> = document
            .metadata
            .iter()
            .map(|(kind, assignment)| {
                RemoteRoleRecord::new(assignment.id.as_str(), kind.wire_name(), assignment.has_accepted)
            })
            .collect();
        self.client.post_roles(content_id, &posted)?;

        info!(
            "event=role_sync module=service status=ok content_id={content_id} removed={} added={} adopted={adopted} posted={} notified={} duration_ms={}",
            removed.len(),
            added.len(),
            posted.len(),
            notified.len(),
            started_at.elapsed().as_millis()
        );
        Ok(RoleSyncReport {
            removed,
            added,
            posted,
            notified,
        })
    }

    /// Sends one message per added assignment whose assignee is not the
    /// principal. Messaging failures are logged and do not abort the sync.
    fn notify_added(&self, document: &Document, added: &[RoleKey], principal: &str) -> Vec<String> {
        let webview_url = self.client.config().webview_url.as_deref();
        let mut notified = Vec::new();
        for key in added {
            if key.uid == principal {
                continue;
            }
            let message = RoleAcceptanceMessage::compose(&key.uid, principal, document, webview_url);
            match message.send(&self.notifier) {
                Ok(()) => notified.push(key.uid.clone()),
                Err(err) => warn!(
                    "event=role_notify module=service status=error content_id={} role={} error={err}",
                    document.id, key.role
                ),
            }
        }
        notified
    }
}

/// Remote keys missing locally, in remote order, without repeats.
fn removal_set(remote: &[RemoteRoleRecord], local: &HashSet<RoleKey>) -> Vec<RoleKey> {
    let mut seen = HashSet::new();
    remote
        .iter()
        .map(RemoteRoleRecord::key)
        .filter(|key| !local.contains(key) && seen.insert(key.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::removal_set;
    use crate::model::acceptance::Acceptance;
    use crate::publishing::{RemoteRoleRecord, RoleKey};
    use std::collections::HashSet;

    fn key(uid: &str, role: &str) -> RoleKey {
        RoleKey {
            uid: uid.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn removal_set_is_remote_minus_local_in_remote_order() {
        let remote = vec![
            RemoteRoleRecord::new("c", "Author", Acceptance::Pending),
            RemoteRoleRecord::new("b", "Author", Acceptance::Accepted),
            RemoteRoleRecord::new("c", "Author", Acceptance::Pending),
            RemoteRoleRecord::new("a", "Editor", Acceptance::Rejected),
        ];
        let local: HashSet<RoleKey> = [key("a", "Author"), key("b", "Author")].into();

        assert_eq!(
            removal_set(&remote, &local),
            vec![key("c", "Author"), key("a", "Editor")]
        );
    }
}
