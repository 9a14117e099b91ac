//! Role reconciliation and publish-readiness core for content authoring.
//! This crate owns the rules; request handling and rendering live elsewhere.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod publishing;
pub mod repo;
pub mod service;

pub use config::{ConfigError, PublishingConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::acceptance::Acceptance;
pub use model::content::{
    ContentId, ContentRef, ContentVersion, Document, License, LicensorAcceptance, MediaType, Tree,
    TreeNode, BINDER_MEDIATYPE, DEFAULT_LICENSE_URL, DOCUMENT_MEDIATYPE,
};
pub use model::role::{RoleAssignment, RoleKind, RoleMetadata, RoleValidationError};
pub use notify::{Notifier, NotifyError, RoleAcceptanceMessage};
pub use publishing::{
    PublishingClient, PublishingError, PublishingFailure, PublishingPhase, PublishingTransport,
    ReqwestTransport,
};
pub use repo::content_repo::{ContentStore, RepoError, RepoResult, SqliteContentRepository};
pub use service::acceptance::{accept_license, accept_roles, RoleActor};
pub use service::acl::AclDeclarer;
pub use service::licensor_sync::{LicensorSyncReport, LicensorSynchronizer};
pub use service::publish_validator::{PublishValidator, ValidationCode, ValidationError};
pub use service::role_sync::{RoleSyncReport, RoleSynchronizer};
pub use service::{Clock, SystemClock};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
