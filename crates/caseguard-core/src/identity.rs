//! Caller identity as handed over by the authentication layer.
//!
//! Grants in the catalog are keyed by either a numeric account id or an
//! address-like string, depending on when they were provisioned. The identity
//! is resolved once into a tagged value and every catalog lookup matches
//! against all of its [`Identity::lookup_keys`].

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// The raw value parsed as an integer. The raw text is kept because
    /// grants may have been stored with the original formatting.
    Numeric { id: i64, raw: String },
    /// Anything else, commonly an email address.
    Opaque(String),
}

impl Identity {
    /// ## Summary
    /// Resolves an already-verified identity string into its tagged form.
    ///
    /// ## Errors
    /// Returns `InvalidInput` if the value is empty after trimming.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput("identity is empty".to_string()));
        }

        Ok(match trimmed.parse::<i64>() {
            Ok(id) => Self::Numeric {
                id,
                raw: trimmed.to_string(),
            },
            Err(_) => Self::Opaque(trimmed.to_string()),
        })
    }

    /// The identity exactly as received (trimmed).
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Numeric { raw, .. } => raw,
            Self::Opaque(raw) => raw,
        }
    }

    #[must_use]
    pub const fn numeric_id(&self) -> Option<i64> {
        match self {
            Self::Numeric { id, .. } => Some(*id),
            Self::Opaque(_) => None,
        }
    }

    /// Every textual form a catalog row may use to refer to this identity.
    ///
    /// Numeric identities yield the canonical integer form first and the raw
    /// form only when it differs (`"007"` -> `["7", "007"]`).
    #[must_use]
    pub fn lookup_keys(&self) -> Vec<String> {
        match self {
            Self::Numeric { id, raw } => {
                let canonical = id.to_string();
                if canonical == *raw {
                    vec![canonical]
                } else {
                    vec![canonical, raw.clone()]
                }
            }
            Self::Opaque(raw) => vec![raw.clone()],
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw())
    }
}
