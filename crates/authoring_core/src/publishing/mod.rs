//! Publishing-service integration surface.
//!
//! # Responsibility
//! - Define wire records exchanged with the publishing ledger.
//! - Isolate HTTP mechanics behind `PublishingTransport`.
//! - Map unexpected responses to phase-tagged `PublishingError`s.
//!
//! # Invariants
//! - Mutating calls (DELETE/POST) always carry `X-API-Key` and a JSON
//!   content type; GETs never carry the key.
//! - Nothing in this module retries.

pub mod client;
pub mod error;
pub mod http;
pub mod records;
pub mod transport;

pub use client::PublishingClient;
pub use error::{PublishingError, PublishingFailure, PublishingPhase};
pub use http::ReqwestTransport;
pub use records::{
    LicensorKey, LicensorLedger, LicensorRemoval, PermissionRecord, RemoteLicensorRecord,
    RemoteRoleRecord, RoleKey, PUBLISH_PERMISSION,
};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, PublishingTransport, TransportError};
