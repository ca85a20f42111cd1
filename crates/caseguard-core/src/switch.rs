//! Process-wide enforcement kill-switch.
//!
//! When the switch is on, every permission check for an authenticated caller
//! is allowed regardless of catalog state. The environment variable is read
//! on every check so operators can flip it without a deploy; when it is unset
//! the configured fallback applies.

use crate::config::AuthzConfig;
use crate::util::truthy::is_truthy_str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcementSwitch {
    env_var: Option<String>,
    fallback: bool,
}

impl EnforcementSwitch {
    #[must_use]
    pub const fn new(env_var: Option<String>, fallback: bool) -> Self {
        Self { env_var, fallback }
    }

    /// A switch that ignores the environment and always reports `disabled`.
    #[must_use]
    pub const fn fixed(disabled: bool) -> Self {
        Self::new(None, disabled)
    }

    #[must_use]
    pub fn from_config(config: &AuthzConfig) -> Self {
        let env_var = config.disabled_env_var.trim();
        Self::new(
            (!env_var.is_empty()).then(|| env_var.to_string()),
            config.disabled,
        )
    }

    /// Returns `true` when authorization enforcement is suspended.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        let Some((name, value)) = self
            .env_var
            .as_deref()
            .and_then(|name| std::env::var(name).ok().map(|value| (name, value)))
        else {
            return self.fallback;
        };

        let disabled = is_truthy_str(&value);
        tracing::trace!(env_var = name, disabled, "Enforcement switch read from environment");
        disabled
    }
}

impl Default for EnforcementSwitch {
    fn default() -> Self {
        Self::from_config(&AuthzConfig::default())
    }
}
