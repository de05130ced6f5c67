//! Persisted login session and identity resolution

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::client::{ApiClient, ApiError, Transport};
use crate::entities::User;

const SESSION_FILE: &str = "session.yaml";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no data directory available for the session file")]
    NoDataDir,

    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is malformed: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// What is stored between invocations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Server the token was issued by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Session {
    /// Token usable against `server`; a token from another server is ignored
    pub fn token_for(&self, server: &str) -> Option<&str> {
        match (&self.token, &self.server) {
            (Some(token), Some(issued_by)) if issued_by.trim_end_matches('/') == server => {
                Some(token.as_str())
            }
            (Some(token), None) => Some(token.as_str()),
            _ => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user data directory
    pub fn default_location() -> Result<Self, SessionError> {
        crate::core::config::data_dir()
            .map(|dir| Self::new(dir.join(SESSION_FILE)))
            .ok_or(SessionError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means an empty session
    pub fn load(&self) -> Result<Session, SessionError> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|e| SessionError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let yaml = serde_yml::to_string(session).map_err(|e| SessionError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, yaml).map_err(io_err)?;
        restrict_permissions(&self.path);
        Ok(())
    }

    /// Forget the token, keeping nothing behind
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::warn!(path = %path.display(), error = %e, "could not restrict session file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

/// Who the current user is, as far as the client knows
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityState {
    /// The `/api/auth/me` call has not completed yet
    Loading,
    Anonymous,
    Authenticated(User),
}

impl IdentityState {
    pub fn user(&self) -> Option<&User> {
        match self {
            IdentityState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Resolve the identity behind the client's token.
///
/// No token, or a token the backend rejects with 401, is anonymous. Other
/// failures are returned so the command can report them.
pub fn resolve_identity<T: Transport>(client: &ApiClient<T>) -> Result<IdentityState, ApiError> {
    if client.token().is_none() {
        return Ok(IdentityState::Anonymous);
    }
    match client.me() {
        Ok(user) => {
            tracing::debug!(username = %user.username, role = %user.role, "identity resolved");
            Ok(IdentityState::Authenticated(user))
        }
        Err(ApiError::Unauthorized { detail }) => {
            tracing::info!(%detail, "stored token rejected");
            Ok(IdentityState::Anonymous)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_is_empty() {
        let tmp = tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session.yaml"));
        let session = store.load().unwrap();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_save_load_clear() {
        let tmp = tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("data").join("session.yaml"));
        let session = Session {
            server: Some("http://localhost:8000".to_string()),
            token: Some("abc".to_string()),
            username: Some("kim".to_string()),
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), session);

        store.clear().unwrap();
        assert!(!store.path().exists());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_malformed_session_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("session.yaml");
        std::fs::write(&path, "token: [oops").unwrap();
        let err = SessionStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionError::Malformed { .. }));
    }

    #[test]
    fn test_token_is_bound_to_server() {
        let session = Session {
            server: Some("http://plant-a:8000/".to_string()),
            token: Some("t".to_string()),
            username: None,
        };
        assert_eq!(session.token_for("http://plant-a:8000"), Some("t"));
        assert_eq!(session.token_for("http://plant-b:8000"), None);
    }

    #[test]
    fn test_resolve_without_token_skips_network() {
        let client = ApiClient::new(FakeTransport::new());
        assert_eq!(resolve_identity(&client).unwrap(), IdentityState::Anonymous);
        assert_eq!(client.transport().call_count(), 0);
    }

    #[test]
    fn test_resolve_rejected_token_is_anonymous() {
        let client = ApiClient::new(
            FakeTransport::new()
                .respond(401, r#"{"detail": "Could not validate credentials"}"#)
                .respond(401, r#"{"detail": "Could not validate credentials"}"#),
        )
        .with_token(Some("stale".to_string()));
        assert_eq!(resolve_identity(&client).unwrap(), IdentityState::Anonymous);
        assert_eq!(client.transport().call_count(), 2);
    }

    #[test]
    fn test_resolve_authenticated() {
        let client = ApiClient::new(
            FakeTransport::new().respond(200, r#"{"id": 2, "username": "mgr", "role": "MANAGER"}"#),
        )
        .with_token(Some("good".to_string()));
        let state = resolve_identity(&client).unwrap();
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("mgr"));
    }

    #[test]
    fn test_resolve_server_error_propagates() {
        let client = ApiClient::new(
            FakeTransport::new()
                .respond(500, "")
                .respond(500, ""),
        )
        .with_token(Some("good".to_string()));
        assert!(matches!(
            resolve_identity(&client),
            Err(ApiError::Status { status: 500, .. })
        ));
    }
}
