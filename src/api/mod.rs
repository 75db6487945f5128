//! HTTP API module for the segment engine.
//!
//! This module exposes run processing and the hand-off builders as REST
//! endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ExportRequest, ProcessRequest};
pub use response::{ApiError, ExportResponse, HandoffResponse, ProcessResponse};
pub use state::AppState;
