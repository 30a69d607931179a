use busway_shared::Masked;
use serde::{Deserialize, Serialize};

/// The signed-in user as handed over by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub user_id: String,
    pub token: Masked<String>,
}

impl SessionCredential {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: Masked::new(token.into()),
        }
    }

    /// Both the user id and the bearer token must be non-blank.
    pub fn is_usable(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.token.expose().trim().is_empty()
    }

    pub fn bearer(&self) -> &str {
        self.token.expose()
    }
}

/// Source of the current session credential.
pub trait SessionProvider: Send + Sync {
    fn current(&self) -> Option<SessionCredential>;
}

/// Session fixed at construction time, e.g. loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    credential: Option<SessionCredential>,
}

impl StaticSession {
    pub fn new(credential: Option<SessionCredential>) -> Self {
        Self { credential }
    }

    pub fn signed_out() -> Self {
        Self { credential: None }
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> Option<SessionCredential> {
        let credential = self.credential.clone().filter(SessionCredential::is_usable);
        if credential.is_none() {
            tracing::debug!("No usable session credential");
        }
        credential
    }
}
