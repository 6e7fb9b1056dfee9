//! Request handlers.
//!
//! Handlers read mirrored records through the shared [`MirrorStore`] and
//! manage dead letters through `hrsync_db`, mapping errors via [`AppError`].
//!
//! [`MirrorStore`]: hrsync_events::MirrorStore
//! [`AppError`]: crate::error::AppError

pub mod mirror;
pub mod sync;
