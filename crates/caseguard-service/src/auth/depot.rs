//! Depot helpers for the authenticated caller and the decision made for it.

use caseguard_core::identity::Identity;

use super::decision::Grant;
use crate::error::{ServiceError, ServiceResult};

pub mod depot_keys {
    pub const AUTHENTICATED_IDENTITY: &str = "__authenticated_identity";
    pub const GRANT: &str = "__grant";
}

/// What the authentication middleware stored for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepotIdentity {
    Identified(Identity),
    Anonymous,
}

/// Get the authenticated identity from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if nothing was stored or the caller is anonymous.
pub fn get_identity_from_depot(depot: &salvo::Depot) -> ServiceResult<&Identity> {
    let depot_identity = depot
        .get::<DepotIdentity>(depot_keys::AUTHENTICATED_IDENTITY)
        .map_err(|_e| ServiceError::NotAuthenticated)?;

    match depot_identity {
        DepotIdentity::Identified(identity) => Ok(identity),
        DepotIdentity::Anonymous => Err(ServiceError::NotAuthenticated),
    }
}

/// Get the grant recorded by the route permission middleware, if any.
#[must_use]
pub fn get_grant_from_depot(depot: &salvo::Depot) -> Option<&Grant> {
    depot.get::<Grant>(depot_keys::GRANT).ok()
}
