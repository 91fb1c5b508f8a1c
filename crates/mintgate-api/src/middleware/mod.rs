//! # Middleware
//!
//! Request-level layers mounted by [`crate::app`]. Tracing is provided by
//! `tower_http::trace::TraceLayer`; authentication lives in [`crate::auth`].

pub mod metrics;
