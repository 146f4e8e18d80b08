use crate::error::{GatewayError, Result};
use std::{env, fmt};

/// Bearer token supplied by the user. Kept in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "Credential(<empty>)")
        } else {
            write!(f, "Credential(<redacted>)")
        }
    }
}

/// Per-session context handed to every gateway call.
#[derive(Debug, Clone)]
pub struct Session {
    credential: Credential,
}

impl Session {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(credential),
        }
    }

    /// Reads `STABILITY_API_KEY`; an unset variable yields an empty credential.
    pub fn from_env() -> Self {
        Self::new(env::var("STABILITY_API_KEY").unwrap_or_default())
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub(crate) fn require_credential(&self) -> Result<&Credential> {
        if self.credential.is_empty() {
            log::error!("No API key supplied for this session");
            return Err(GatewayError::MissingCredential);
        }
        Ok(&self.credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_is_redacted() {
        let session = Session::new("sk-secret");
        let printed = format!("{:?}", session);
        assert!(!printed.contains("sk-secret"));
        assert_eq!(session.credential().bearer(), "Bearer sk-secret");
    }

    #[test]
    fn test_empty_credential_is_missing() {
        let session = Session::new("");
        assert!(matches!(
            session.require_credential(),
            Err(GatewayError::MissingCredential)
        ));
    }
}
