// src/log.rs

//! Logging for the painting engine.
//!
//! The crate logs through the `log` facade and never installs a logger of
//! its own; the host application picks the backend.
//!
//! Levels used inside the crate:
//! - `debug!` for layer changes, commands and skipped brushes,
//! - `trace!` for per-stamp and per-composition detail,
//! - `warn!` for inputs that are accepted but clamped.

pub use log::{debug, trace, warn};

