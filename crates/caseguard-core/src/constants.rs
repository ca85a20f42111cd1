/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const AUTHZ_ROUTE_COMPONENT: &str = "authz";
pub const AUTHZ_API_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", AUTHZ_ROUTE_COMPONENT);

/// Header carrying the original URI in forward-auth deployments.
pub const FORWARDED_URI_HEADER: &str = "x-forwarded-uri";

/// Action key used when neither the caller nor the action table supplies one.
pub const DEFAULT_ACTION_KEY: &str = "VIEW";
