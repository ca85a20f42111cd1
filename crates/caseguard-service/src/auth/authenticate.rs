use caseguard_core::config::{AuthMethod, Settings};
use caseguard_core::identity::Identity;

use crate::error::{ServiceError, ServiceResult};

/// The identity configured for single user mode.
///
/// ## Errors
///
/// Returns `InvalidConfiguration` if the single user section is missing or blank.
fn authenticate_single_user(config: &Settings) -> ServiceResult<Identity> {
    tracing::debug!("Authenticating single user");

    let single_user_config =
        config
            .auth
            .single_user
            .as_ref()
            .ok_or(ServiceError::InvalidConfiguration(
                "Single user config is missing".to_string(),
            ))?;

    Identity::parse(&single_user_config.identity).map_err(|_e| {
        ServiceError::InvalidConfiguration("Single user identity is empty".to_string())
    })
}

/// ## Summary
/// Reads the identity the upstream proxy verified from the configured header.
///
/// ## Errors
/// Returns `NotAuthenticated` if the header is absent, not valid text or blank.
fn authenticate_proxy(req: &salvo::Request, config: &Settings) -> ServiceResult<Identity> {
    let header = config
        .auth
        .proxy
        .as_ref()
        .map(|proxy| proxy.header.as_str())
        .ok_or(ServiceError::InvalidConfiguration(
            "Proxy authentication is not configured".to_string(),
        ))?;

    let value = req
        .headers()
        .get(header)
        .and_then(|value| value.to_str().ok())
        .ok_or(ServiceError::NotAuthenticated)?;

    Identity::parse(value).map_err(|_e| ServiceError::NotAuthenticated)
}

/// ## Summary
/// Authenticate a caller based on the configured authentication method.
///
/// ## Errors
/// Returns an error if authentication fails.
#[tracing::instrument(skip(req, config))]
pub fn authenticate(req: &salvo::Request, config: &Settings) -> ServiceResult<Identity> {
    tracing::trace!(auth_method = ?config.auth.method, "Authenticating request");

    match config.auth.method {
        AuthMethod::SingleUser => authenticate_single_user(config),
        AuthMethod::Proxy => authenticate_proxy(req, config),
    }
}
