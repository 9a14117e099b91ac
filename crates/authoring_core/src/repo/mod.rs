//! Content lookup contracts and SQLite persistence.
//!
//! # Responsibility
//! - Define the lookup-by-id collaborator used by publish validation.
//! - Keep SQL details behind the repository boundary.
//!
//! # Invariants
//! - Lookups are version aware; an unspecified version means the draft.
//! - Persisted rows that fail to decode surface as `InvalidData`, never
//!   as a missing item.

pub mod content_repo;
