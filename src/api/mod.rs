//! REST API module
//!
//! HTTP boundary over the user service: routing, wire DTO serialization and
//! the centralized error translation.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;

pub use router::create_api_router;
