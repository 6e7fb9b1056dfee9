//! Domain types shared by the HR sync workspace.
//!
//! - [`topic`]: entity kinds, verbs and the `event.<Entity>.<verb>` topic grammar.
//! - [`sync`]: validated event payloads for every mirrored entity and the
//!   [`SyncRecord`](sync::SyncRecord) union the persistence layer consumes.
//! - [`error`]: the domain error type.
//! - [`config`]: environment variable parsing shared by the binaries.

pub mod config;
pub mod error;
pub mod pagination;
pub mod sync;
pub mod topic;
pub mod types;
