use salvo::Depot;
use tracing::error;

use crate::config::get_config_from_depot;
use caseguard_service::auth::authenticate::authenticate;
use caseguard_service::auth::depot::{DepotIdentity, depot_keys};
use caseguard_service::error::ServiceError;

/// ## Summary
/// Middleware handler for authentication.
///
/// Resolves the caller's identity once per request and stores it in the
/// depot as [`DepotIdentity`]. Never rejects on its own: an unauthenticated
/// caller is stored as `Anonymous` and turned away by whatever guard runs next.
pub struct AuthMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        if req.method() == salvo::http::Method::OPTIONS {
            depot.insert(depot_keys::AUTHENTICATED_IDENTITY, DepotIdentity::Anonymous);
            return;
        }

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        match authenticate(req, &config) {
            Ok(identity) => {
                tracing::debug!(identity = %identity, "Caller authenticated");
                depot.insert(
                    depot_keys::AUTHENTICATED_IDENTITY,
                    DepotIdentity::Identified(identity),
                );
            }
            Err(ServiceError::NotAuthenticated) => {
                tracing::debug!("Request not authenticated, treating as anonymous");
                depot.insert(depot_keys::AUTHENTICATED_IDENTITY, DepotIdentity::Anonymous);
            }
            Err(ServiceError::InvalidConfiguration(reason)) => {
                tracing::warn!(%reason, "Authentication misconfigured, treating as anonymous");
                depot.insert(depot_keys::AUTHENTICATED_IDENTITY, DepotIdentity::Anonymous);
            }
            Err(service_err) => {
                error!(error = ?service_err, "Authentication failed with error");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                res.body("Internal Server Error");
                ctrl.skip_rest();
            }
        }
    }
}
