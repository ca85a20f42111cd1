pub mod auth;
pub mod route_permission;
pub mod super_user;

use salvo::http::StatusCode;
use salvo::prelude::Json;
use serde_json::json;

/// Writes `{"error": message}` with the given status and stops the chain.
pub(crate) fn reject(
    res: &mut salvo::Response,
    ctrl: &mut salvo::FlowCtrl,
    status: StatusCode,
    message: &str,
) {
    res.status_code(status);
    res.render(Json(json!({ "error": message })));
    ctrl.skip_rest();
}
