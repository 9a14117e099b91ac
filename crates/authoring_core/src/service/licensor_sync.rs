//! Licensor ledger reconciliation.
//!
//! # Invariants
//! - A failed GET is tolerated: the removal set is empty and the POST
//!   still runs. Role synchronization treats the same failure as fatal.
//! - The local license URL is authoritative and always sent.
//! - An empty removal set never issues a DELETE.

use crate::model::content::Document;
use crate::publishing::{
    LicensorKey, LicensorLedger, LicensorRemoval, PublishingClient, PublishingError,
    PublishingTransport, RemoteLicensorRecord,
};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Instant;

/// Outcome of one successful licensor synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LicensorSyncReport {
    /// Whether the ledger GET failed and was skipped over.
    pub fetch_tolerated: bool,
    /// Remote licensor uids deleted, in remote order.
    pub removed: Vec<String>,
    /// Ledger sent by the POST.
    pub posted: LicensorLedger,
}

/// Licensor synchronizer facade.
pub struct LicensorSynchronizer<'a, T: PublishingTransport> {
    client: &'a PublishingClient<T>,
}

impl<'a, T: PublishingTransport> LicensorSynchronizer<'a, T> {
    pub fn new(client: &'a PublishingClient<T>) -> Self {
        Self { client }
    }

    /// Reconciles `document`'s licensor acceptance with the ledger.
    ///
    /// # Errors
    /// - `DeleteFailed` when the DELETE does not return 200; no POST follows.
    /// - `PostFailed` when the POST does not return 202.
    pub fn declare_licensors(&self, document: &Document) -> Result<LicensorSyncReport, PublishingError> {
        let started_at = Instant::now();
        let content_id = document.id;
        info!("event=licensor_sync module=service status=start content_id={content_id}");

        let (remote, fetch_tolerated) = match self.client.fetch_licensors(content_id) {
            Ok(ledger) => {
                if ledger.license_url.as_deref() != Some(document.license.url.as_str()) {
                    debug!(
                        "event=licensor_sync_license module=service status=changed content_id={content_id}"
                    );
                }
                (ledger.licensors, false)
            }
            Err(err) => {
                warn!(
                    "event=licensor_sync_fetch module=service status=skipped content_id={content_id} error={err}"
                );
                (Vec::new(), true)
            }
        };

        let local: HashSet<&str> = document
            .licensor_acceptance
            .iter()
            .map(|entry| entry.id.as_str())
            .collect();
        let mut seen = HashSet::new();
        let removed: Vec<String> = remote
            .iter()
            .map(|record| record.uid.clone())
            .filter(|uid| !local.contains(uid.as_str()) && seen.insert(uid.clone()))
            .collect();

        if removed.is_empty() {
            debug!("event=licensor_sync_delete module=service status=skipped content_id={content_id}");
        } else {
            let removal = LicensorRemoval {
                licensors: removed
                    .iter()
                    .map(|uid| LicensorKey { uid: uid.clone() })
                    .collect(),
            };
            self.client.delete_licensors(content_id, &removal)?;
        }

        let posted = LicensorLedger {
            license_url: Some(document.license.url.clone()),
            licensors: document
                .licensor_acceptance
                .iter()
                .map(|entry| RemoteLicensorRecord::new(entry.id.as_str(), entry.has_accepted))
                .collect(),
        };
        self.client.post_licensors(content_id, &posted)?;

        info!(
            "event=licensor_sync module=service status=ok content_id={content_id} fetch_tolerated={fetch_tolerated} removed={} posted={} duration_ms={}",
            removed.len(),
            posted.licensors.len(),
            started_at.elapsed().as_millis()
        );
        Ok(LicensorSyncReport {
            fetch_tolerated,
            removed,
            posted,
        })
    }
}
