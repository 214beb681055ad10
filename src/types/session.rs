/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
}

/// Answers whether the current caller holds an authenticated session.
pub trait SessionOracle: Send + Sync {
    fn current_session(&self) -> Option<Session>;

    fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }
}

/// A session oracle with a fixed answer, decided when the request is received.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(Option<Session>);

impl StaticSession {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(user: &str) -> Self {
        Self(Some(Session {
            user: user.to_string(),
        }))
    }

    /// Authenticated when `presented` matches the configured token.
    /// No configured token means nobody can authenticate.
    pub fn from_token(expected: Option<&str>, presented: Option<&str>) -> Self {
        match (expected, presented) {
            (Some(e), Some(p)) if !e.is_empty() && e == p => Self::authenticated("token"),
            _ => Self::anonymous(),
        }
    }
}

impl SessionOracle for StaticSession {
    fn current_session(&self) -> Option<Session> {
        self.0.clone()
    }
}
