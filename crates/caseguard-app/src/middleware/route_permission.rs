use salvo::Depot;
use salvo::http::StatusCode;
use salvo::prelude::Json;

use caseguard_core::constants::FORWARDED_URI_HEADER;
use caseguard_service::auth::decision::Decision;
use caseguard_service::auth::depot::{depot_keys, get_identity_from_depot};
use caseguard_service::auth::resolver::get_resolver_from_depot;

use super::reject;

/// ## Summary
/// Guards a route with a permission check for the authenticated caller.
///
/// The route checked is the forwarded URI when a reverse proxy supplies one,
/// otherwise the request path. The action is always derived from that route;
/// request headers cannot name a different one.
///
/// ## Side Effects
/// Inserts the [`Grant`](caseguard_service::auth::decision::Grant) into the
/// depot on allow.
///
/// ## Errors
/// Responds 401 without an identity and 403 with the deny diagnostics as JSON.
pub struct RoutePermissionMiddleware;

fn header_value<'a>(req: &'a salvo::Request, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[salvo::async_trait]
impl salvo::Handler for RoutePermissionMiddleware {
    #[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let Ok(identity) = get_identity_from_depot(depot).cloned() else {
            reject(res, ctrl, StatusCode::UNAUTHORIZED, "Not authenticated");
            return;
        };

        let resolver = match get_resolver_from_depot(depot) {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::error!(error = %e, "Permission resolver missing");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let route = header_value(req, FORWARDED_URI_HEADER)
            .unwrap_or_else(|| req.uri().path())
            .to_string();

        match resolver.resolve(&identity, &route, None).await {
            Decision::Allow(grant) => {
                tracing::debug!(?grant, "Route permission granted");
                depot.insert(depot_keys::GRANT, grant);
            }
            Decision::Deny(diagnostics) => {
                res.status_code(StatusCode::FORBIDDEN);
                res.render(Json(diagnostics));
                ctrl.skip_rest();
            }
        }
    }
}
