mod authz;
mod healthcheck;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use caseguard_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, AUTHZ_API_ROUTE_PREFIX, AUTHZ_ROUTE_COMPONENT,
};

/// ## Summary
/// Constructs the JSON API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .hoop(AuthMiddleware)
        .push(healthcheck::routes())
        .push(authz::routes())
}
