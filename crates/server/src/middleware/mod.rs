//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. Catch panic (turn handler panics into 500 responses)
//! 3. `TraceLayer` (request span with a `request_id` field)
//! 4. Request ID (fill the span field, echo `x-request-id`)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)

pub mod auth;
pub mod request_id;
pub mod session;
pub mod validation;

pub use auth::{RequireAuth, RequireCustomer, set_current_user};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
pub use validation::ValidatedJson;
