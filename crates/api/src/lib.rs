//! Operations API for the HR sync mirror.
//!
//! Exposes health, the registered topic list, read access to mirrored
//! records and dead-letter management. Shared by the binary and the
//! integration tests.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
