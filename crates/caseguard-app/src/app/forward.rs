//! Forward-auth endpoint for a reverse proxy in front of the dashboard.
//!
//! The proxy sends the original URI in `X-Forwarded-Uri`; a 200 lets the
//! request through, a 401 or 403 blocks it.

use salvo::prelude::Json;
use salvo::{Depot, Router, handler};
use serde_json::json;

use caseguard_core::constants::AUTHZ_ROUTE_COMPONENT;
use caseguard_service::auth::depot::get_grant_from_depot;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::route_permission::RoutePermissionMiddleware;

#[handler]
async fn forward(depot: &Depot) -> Json<serde_json::Value> {
    match get_grant_from_depot(depot) {
        Some(grant) => Json(json!({ "decision": "allow", "detail": grant })),
        None => Json(json!({ "decision": "allow" })),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTHZ_ROUTE_COMPONENT).push(
        Router::with_path("forward")
            .hoop(AuthMiddleware)
            .hoop(RoutePermissionMiddleware)
            .get(forward),
    )
}
