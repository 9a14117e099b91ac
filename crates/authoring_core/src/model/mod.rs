//! Domain model for role reconciliation and publish readiness.
//!
//! # Responsibility
//! - Define canonical content, role and acceptance records used by services.
//! - Keep one typed container per recognized role kind.
//!
//! # Invariants
//! - Acceptance is tri-state everywhere; `Pending` is never folded into
//!   `Rejected`.
//! - Unrecognized role kinds survive serialization untouched.

pub mod acceptance;
pub mod content;
pub mod role;
