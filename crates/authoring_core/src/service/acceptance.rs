//! In-memory application of acceptance decisions.
//!
//! # Invariants
//! - Only assignments whose id equals the actor's id are touched.
//! - An assignment already holding the decided state keeps its provenance.
//! - No network call is made.

use crate::model::acceptance::Acceptance;
use crate::model::content::{Document, LicensorAcceptance};
use crate::model::role::RoleMetadata;
use chrono::{DateTime, Utc};
use log::info;

/// User responding to their role assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleActor {
    pub id: String,
    pub has_accepted: Acceptance,
}

impl RoleActor {
    pub fn accepting(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            has_accepted: Acceptance::Accepted,
        }
    }

    pub fn rejecting(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            has_accepted: Acceptance::Rejected,
        }
    }
}

/// Applies `actor`'s decision to every recognized role they hold.
///
/// `principal` is the authenticated user performing the request and is
/// recorded as requester. Returns the number of assignments changed; a
/// pending decision changes nothing.
pub fn accept_roles(
    metadata: &mut RoleMetadata,
    actor: &RoleActor,
    principal: &str,
    now: DateTime<Utc>,
) -> usize {
    if actor.has_accepted.is_pending() {
        return 0;
    }

    let mut changed = 0;
    for (_, assignment) in metadata.iter_mut() {
        if assignment.id != actor.id {
            continue;
        }
        if assignment.has_accepted == actor.has_accepted && assignment.has_provenance() {
            continue;
        }
        assignment.has_accepted = actor.has_accepted;
        assignment.assignment_date = Some(now);
        assignment.requester = Some(principal.to_string());
        changed += 1;
    }

    info!(
        "event=accept_roles module=service status=ok decision={} changed={changed}",
        actor.has_accepted.as_str()
    );
    changed
}

/// Records `user_id`'s response to the document license.
///
/// Updates the existing licensor entry or appends one. Returns whether
/// the acceptance list changed.
pub fn accept_license(document: &mut Document, user_id: &str, decision: Acceptance) -> bool {
    let changed = match document
        .licensor_acceptance
        .iter_mut()
        .find(|entry| entry.id == user_id)
    {
        Some(entry) if entry.has_accepted == decision => false,
        Some(entry) => {
            entry.has_accepted = decision;
            true
        }
        None => {
            document
                .licensor_acceptance
                .push(LicensorAcceptance::new(user_id, decision));
            true
        }
    };

    info!(
        "event=accept_license module=service status=ok content_id={} decision={} changed={changed}",
        document.id,
        decision.as_str()
    );
    changed
}
