//! Identity state as reported by the login provider.

use std::fmt;

/// Credentials for an authenticated user
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Stable identity of the user; becomes `ownerId` on created documents
    pub owner_id: String,

    /// Opaque token forwarded to the store and the renderer
    pub token: String,
}

impl Credentials {
    pub fn new(owner_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("owner_id", &self.owner_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdentityState {
    #[default]
    Unauthenticated,
    Authenticated(Credentials),
}

impl IdentityState {
    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            IdentityState::Authenticated(credentials) => Some(credentials),
            IdentityState::Unauthenticated => None,
        }
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.credentials().map(|c| c.owner_id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let creds = Credentials::new("g-1", "secret-token");
        let shown = format!("{:?}", IdentityState::Authenticated(creds));
        assert!(shown.contains("g-1"));
        assert!(!shown.contains("secret-token"));
    }

    #[test]
    fn test_default_is_signed_out() {
        let state = IdentityState::default();
        assert!(!state.is_authenticated());
        assert_eq!(state.owner_id(), None);
    }
}
