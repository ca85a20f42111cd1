//! Decision inspection for administrators.

use salvo::http::StatusCode;
use salvo::prelude::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Deserialize;
use serde_json::json;

use caseguard_core::constants::AUTHZ_ROUTE_COMPONENT;
use caseguard_core::identity::Identity;
use caseguard_service::auth::resolver::get_resolver_from_depot;

use crate::middleware::super_user::RequireSuperUser;

#[derive(Debug, Deserialize)]
struct CheckRequest {
    identity: String,
    route: String,
    #[serde(default)]
    action: Option<String>,
}

fn bad_request(res: &mut Response, message: &str) {
    res.status_code(StatusCode::BAD_REQUEST);
    res.render(Json(json!({ "error": message })));
}

/// ## Summary
/// Resolves a permission decision for an arbitrary identity and returns it
/// with full diagnostics.
///
/// ## Errors
/// Returns 400 for a malformed body or a blank identity.
#[handler]
#[tracing::instrument(skip_all)]
async fn check(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let body = match req.parse_json::<CheckRequest>().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(error = %e, "Malformed check request");
            bad_request(res, "Expected a JSON body with identity, route and optional action");
            return;
        }
    };

    let Ok(identity) = Identity::parse(&body.identity) else {
        bad_request(res, "identity must not be empty");
        return;
    };

    let resolver = match get_resolver_from_depot(depot) {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::error!(error = %e, "Permission resolver missing");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    let decision = resolver
        .resolve(&identity, &body.route, body.action.as_deref())
        .await;

    tracing::info!(
        identity = %identity,
        route = %body.route,
        allowed = decision.is_allowed(),
        "Decision inspected"
    );

    res.render(Json(decision));
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTHZ_ROUTE_COMPONENT).push(
        Router::with_path("check")
            .hoop(RequireSuperUser)
            .post(check),
    )
}
