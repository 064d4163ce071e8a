//! Request-interception stages, applied in a statically ordered pipeline:
//! CORS, then the payload-size guard, then bearer auth, then the fixed-window
//! rate limiter. The size guard must reject oversized bodies before auth or
//! rate limiting spend any work on them; the router encodes that order and
//! the access-control tests pin it.

mod auth;
mod payload_guard;
mod rate_limit;

pub use auth::bearer_auth;
pub use payload_guard::payload_guard;
pub use rate_limit::{endpoint_group, rate_limit, FixedWindowLimiter};
