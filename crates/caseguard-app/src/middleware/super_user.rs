use salvo::Depot;
use salvo::http::StatusCode;

use caseguard_service::auth::depot::get_identity_from_depot;
use caseguard_service::auth::resolver::get_resolver_from_depot;

use super::reject;

/// ## Summary
/// Admits only Super Users to administrative endpoints.
///
/// A failed account lookup is treated as "not a Super User".
pub struct RequireSuperUser;

#[salvo::async_trait]
impl salvo::Handler for RequireSuperUser {
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

        match resolver.is_super_user(&identity).await {
            Ok(true) => tracing::debug!(identity = %identity, "Super User admitted"),
            Ok(false) => {
                tracing::debug!(identity = %identity, "Not a Super User");
                reject(res, ctrl, StatusCode::FORBIDDEN, "Super User required");
            }
            Err(e) => {
                tracing::error!(error = %e, identity = %identity, "Super User check failed; denying");
                reject(res, ctrl, StatusCode::FORBIDDEN, "Super User required");
            }
        }
    }
}
