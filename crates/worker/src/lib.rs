//! The mirror consumer process: configuration and wiring around
//! [`hrsync_events::ConsumerRuntime`].

pub mod config;
