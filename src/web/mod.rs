//! HTTP surface for the drinks menu
//!
//! Routes requests through an explicit chain: authenticate (bearer
//! extraction and verification), authorize (permission check), then
//! handle. Each stage short-circuits with the shared error envelope.

mod error;
mod guard;
pub mod handlers;
mod server;

pub use error::ApiError;
pub use guard::BearerClaims;
pub use server::{ApiServer, AppState};
