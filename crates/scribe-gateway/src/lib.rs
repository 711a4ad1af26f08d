//! HTTP gateway to the generation and classification backends.
//!
//! One POST per call, JSON in and JSON out, bounded by a timeout and never
//! retried. Backend replies are passed back unmodified.

pub mod backend;
pub mod error;
pub mod gateway;

pub use backend::{BackendRef, BackendTable};
pub use error::{UpstreamCause, UpstreamError};
pub use gateway::{BackendGateway, BackendReply, HttpGateway};
