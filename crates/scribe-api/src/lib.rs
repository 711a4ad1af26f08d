//! Scribe API crate - axum HTTP surface for the request router.
//!
//! Exposes `/process` and `/reset` for clients plus `/health` and
//! `/sessions/{id}` for operators.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
