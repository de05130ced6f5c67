//! Per-invocation application context
//!
//! Built once in `main` and passed by reference to every command. Holds the
//! merged config, the stored session, the API client and the response cache.

use miette::{bail, IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::cache::{Invalidate, Mutation, QueryCache, QueryKey};
use crate::core::client::{ApiClient, ApiError, HttpTransport};
use crate::core::guard::{guard_for_path, refusal_message, GuardOutcome};
use crate::core::session::{resolve_identity, IdentityState, Session, SessionStore};
use crate::core::Config;
use crate::entities::User;

pub struct AppContext {
    pub config: Config,
    pub global: GlobalOpts,
    pub store: SessionStore,
    pub session: Session,
    pub api: ApiClient<HttpTransport>,
    pub cache: QueryCache,
}

impl AppContext {
    pub fn new(global: &GlobalOpts) -> Result<Self> {
        let config = Config::load().with_server_override(global.server.clone());
        let server = config.server();

        let store = SessionStore::default_location().into_diagnostic()?;
        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session file");
                Session::default()
            }
        };
        let token = session.token_for(&server).map(str::to_string);

        let transport = HttpTransport::new(&server, config.timeout_secs())?;
        let api = ApiClient::new(transport)
            .with_token(token.clone())
            .with_read_retries(config.read_retries());

        let mut cache = open_cache()?;
        cache.set_identity(token.as_deref());

        tracing::debug!(%server, logged_in = token.is_some(), "context ready");

        Ok(Self {
            config,
            global: global.clone(),
            store,
            session,
            api,
            cache,
        })
    }

    pub fn server(&self) -> String {
        self.config.server()
    }

    /// Output format with `Auto` resolved through `default_format`
    pub fn format(&self) -> OutputFormat {
        if self.global.format != OutputFormat::Auto {
            return self.global.format;
        }
        self.config
            .default_format
            .as_deref()
            .and_then(OutputFormat::from_str_ci)
            .unwrap_or(OutputFormat::Auto)
    }

    pub fn quiet(&self) -> bool {
        self.global.quiet
    }

    /// Resolve the identity and apply the guard for `path`.
    ///
    /// Returns the user when the route is allowed. A refused route becomes
    /// an error carrying the refusal message.
    pub fn require(&self, path: &str) -> Result<Option<User>> {
        let Some(guard) = guard_for_path(path) else {
            return Ok(None);
        };

        // Stays Loading until /api/auth/me answers; the CLI simply blocks on it
        let identity: IdentityState = resolve_identity(&self.api).map_err(miette::Report::new)?;

        match guard.check(&identity) {
            GuardOutcome::Allow => Ok(identity.user().cloned()),
            outcome => {
                let message = refusal_message(&outcome).unwrap_or("access denied");
                tracing::debug!(path, ?outcome, "route refused");
                bail!("{}", message)
            }
        }
    }

    /// Read through the response cache
    pub fn cached<T, F>(&self, key: &QueryKey, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&ApiClient<HttpTransport>) -> std::result::Result<T, ApiError>,
    {
        self.cache
            .fetch(key, self.config.cache_ttl_secs(), || fetch(&self.api))
            .map_err(miette::Report::new)
    }

    /// Drop every cached query made stale by a write
    pub fn invalidate(&self, mutation: Mutation) {
        self.cache.invalidate_all(&mutation.invalidates());
    }

    /// Store a fresh token and switch the cache scope to it
    pub fn save_login(&mut self, username: &str, token: String) -> Result<()> {
        let session = Session {
            server: Some(self.server()),
            token: Some(token.clone()),
            username: Some(username.to_string()),
        };
        self.store.save(&session).into_diagnostic()?;
        self.session = session;
        self.cache.set_identity(Some(&token));
        self.api.set_token(Some(token));
        Ok(())
    }

    /// Remove the token and everything cached for it
    pub fn logout(&mut self) -> Result<usize> {
        let removed = match self.cache.clear_scope() {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "could not clear cached responses");
                0
            }
        };
        self.store.clear().into_diagnostic()?;
        self.session = Session::default();
        self.api.set_token(None);
        self.cache.set_identity(None);
        Ok(removed)
    }
}

fn open_cache() -> Result<QueryCache> {
    let opened = QueryCache::default_path()
        .map(|path| QueryCache::open(&path))
        .transpose();
    match opened {
        Ok(Some(cache)) => return Ok(cache),
        Ok(None) => tracing::warn!("no cache directory; using an in-memory cache"),
        Err(e) => {
            tracing::warn!(error = %e, "could not open response cache; using an in-memory cache")
        }
    }
    QueryCache::open_in_memory().into_diagnostic()
}
