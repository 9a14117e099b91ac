//! Wire records for the publishing ledger.

use crate::model::acceptance::Acceptance;
use serde::{Deserialize, Serialize};

/// Permission granted to pre-accepted roles at creation time.
pub const PUBLISH_PERMISSION: &str = "publish";

/// One `(uid, role)` entry of the remote role ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRoleRecord {
    pub uid: String,
    /// Wire role name (`Author`, `Editor`, ...).
    pub role: String,
    #[serde(default)]
    pub has_accepted: Acceptance,
    /// Content id echoed back by the service; never sent.
    #[serde(default, rename = "uuid", skip_serializing)]
    pub content_id: Option<String>,
}

impl RemoteRoleRecord {
    pub fn new(uid: impl Into<String>, role: impl Into<String>, has_accepted: Acceptance) -> Self {
        Self {
            uid: uid.into(),
            role: role.into(),
            has_accepted,
            content_id: None,
        }
    }

    pub fn key(&self) -> RoleKey {
        RoleKey {
            uid: self.uid.clone(),
            role: self.role.clone(),
        }
    }
}

/// Identity of a role ledger entry; also the DELETE body element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleKey {
    pub uid: String,
    pub role: String,
}

/// One licensor entry of the remote ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLicensorRecord {
    pub uid: String,
    #[serde(default)]
    pub has_accepted: Acceptance,
    #[serde(default, rename = "uuid", skip_serializing)]
    pub content_id: Option<String>,
}

impl RemoteLicensorRecord {
    pub fn new(uid: impl Into<String>, has_accepted: Acceptance) -> Self {
        Self {
            uid: uid.into(),
            has_accepted,
            content_id: None,
        }
    }
}

/// Licensor ledger as returned by GET and sent by POST.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LicensorLedger {
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub licensors: Vec<RemoteLicensorRecord>,
}

/// DELETE body element for licensors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicensorKey {
    pub uid: String,
}

/// DELETE body for licensors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensorRemoval {
    pub licensors: Vec<LicensorKey>,
}

/// Permission grant sent to the ACL endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub uid: String,
    pub permission: String,
}

impl PermissionRecord {
    pub fn publish(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            permission: PUBLISH_PERMISSION.to_string(),
        }
    }
}
