//! Authentication: JWT verification and the request auth context.
//!
//! Role claims carried by tokens are untrusted input; `AuthContext` is the
//! only place they enter the system, and it validates them against the
//! closed role set before anything branches on them.

mod claims;
mod context;
mod middleware;
mod verifier;

pub use claims::Claims;
pub use context::AuthContext;
pub use middleware::RequireAuth;
pub use verifier::TokenVerifier;
