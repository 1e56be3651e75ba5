//! HTTP middleware for the API.
//!
//! # Layer order (outermost first)
//!
//! 1. Sentry hub and transaction layers
//! 2. CORS (any origin, method and header)
//! 3. `TraceLayer` with a `request_id` span field
//! 4. Request ID

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
