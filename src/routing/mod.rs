// ============================================================================
// ROUTING - Paths, navigation and the authentication guard
// ============================================================================

pub mod navigator;
pub mod routes;
pub mod route_guard;

pub use navigator::*;
pub use routes::*;
pub use route_guard::*;
