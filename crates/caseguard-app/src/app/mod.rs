pub mod api;
pub mod forward;

use std::sync::Arc;

use salvo::Router;

use caseguard_core::config::Settings;
use caseguard_service::auth::resolver::{PermissionResolver, PermissionResolverHandler};

use crate::config::ConfigHandler;

/// ## Summary
/// The full service router with shared state injected for every request.
#[must_use]
pub fn router(settings: Arc<Settings>, resolver: Arc<PermissionResolver>) -> Router {
    Router::new()
        .hoop(ConfigHandler { settings })
        .hoop(PermissionResolverHandler { resolver })
        .push(forward::routes())
        .push(api::routes())
}
