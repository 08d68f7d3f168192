//! HTTP API for sonascore
//!
//! One analysis endpoint plus the standard health check.

pub mod handlers;
pub mod server;

pub use server::create_router;
