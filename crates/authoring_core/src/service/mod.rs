//! Reconciliation and publish-readiness use cases.
//!
//! # Responsibility
//! - Apply acceptance decisions to role containers in memory.
//! - Reconcile role, licensor and permission ledgers with publishing.
//! - Fold publish-readiness checks through binder trees.
//!
//! # Invariants
//! - Every component runs synchronously within one request; nothing is
//!   queued or retried.
//! - Callers persist the document after a successful mutation.

pub mod acceptance;
pub mod acl;
pub mod licensor_sync;
pub mod publish_validator;
pub mod role_sync;

use chrono::{DateTime, Utc};

/// Source of "now" for provenance stamping.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
