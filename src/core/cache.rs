//! SQLite-backed response cache keyed by query keys
//!
//! Responses are stored as JSON under a [`QueryKey`] and scoped to the
//! identity that fetched them. Mutations invalidate keys by prefix, so
//! invalidating `["equipment"]` also drops `["equipment", "4"]` and every
//! filtered equipment list.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

const CACHE_FILE: &str = "cache.db";
const SCHEMA_VERSION: i32 = 1;
const KEY_SEPARATOR: char = '\u{1f}';
const ANONYMOUS_SCOPE: &str = "anonymous";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Hierarchical cache key such as `["equipment", "4"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn root(name: &str) -> Self {
        Self(vec![name.to_string()])
    }

    pub fn with(mut self, part: impl ToString) -> Self {
        self.0.push(part.to_string());
        self
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Each part is terminated by a unit separator so `["equipment"]` is a
    /// prefix of `["equipment", "4"]` but not of `["equipment-requests"]`
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for part in &self.0 {
            out.push_str(part);
            out.push(KEY_SEPARATOR);
        }
        out
    }

    /// True when invalidating `self` also drops `other`
    pub fn is_prefix_of(&self, other: &QueryKey) -> bool {
        other.0.len() >= self.0.len() && other.0.iter().zip(&self.0).all(|(a, b)| a == b)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Something that can drop cached queries after a mutation
pub trait Invalidate {
    fn invalidate(&self, key: &QueryKey);

    fn invalidate_all(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(key);
        }
    }
}

/// The standard query keys used by commands
pub mod keys {
    use super::QueryKey;
    use crate::core::client::{EquipmentQuery, RequestQuery};

    pub const MAINTENANCE_REQUESTS: &str = "maintenance-requests";
    pub const EQUIPMENT: &str = "equipment";
    pub const EQUIPMENT_REQUESTS: &str = "equipment-requests";
    pub const MAINTENANCE_TEAMS: &str = "maintenance-teams";
    pub const TECHNICIANS: &str = "technicians";
    pub const USERS: &str = "users";
    pub const REPORTS: &str = "reports";
    pub const CALENDAR_EVENTS: &str = "calendar-events";

    pub fn maintenance_requests() -> QueryKey {
        QueryKey::root(MAINTENANCE_REQUESTS)
    }

    pub fn request_list(query: &RequestQuery) -> QueryKey {
        QueryKey::new(std::iter::once(MAINTENANCE_REQUESTS.to_string()).chain(query.key_parts()))
    }

    pub fn request(id: i64) -> QueryKey {
        maintenance_requests().with("id").with(id)
    }

    pub fn equipment_list(query: &EquipmentQuery) -> QueryKey {
        QueryKey::new(std::iter::once(EQUIPMENT.to_string()).chain(query.key_parts()))
    }

    pub fn equipment(id: i64) -> QueryKey {
        QueryKey::root(EQUIPMENT).with(id)
    }

    pub fn equipment_requests(id: i64) -> QueryKey {
        QueryKey::root(EQUIPMENT_REQUESTS).with(id)
    }

    pub fn maintenance_teams() -> QueryKey {
        QueryKey::root(MAINTENANCE_TEAMS)
    }

    pub fn technicians() -> QueryKey {
        QueryKey::root(TECHNICIANS)
    }

    pub fn users() -> QueryKey {
        QueryKey::root(USERS)
    }

    pub fn reports() -> QueryKey {
        QueryKey::root(REPORTS)
    }

    pub fn calendar_events() -> QueryKey {
        QueryKey::root(CALENDAR_EVENTS)
    }
}

/// Kinds of write, each mapped to the keys it makes stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Request,
    Equipment,
    Team,
    User,
}

impl Mutation {
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Mutation::Request => vec![
                keys::maintenance_requests(),
                keys::calendar_events(),
                QueryKey::root(keys::EQUIPMENT_REQUESTS),
            ],
            Mutation::Equipment => vec![QueryKey::root(keys::EQUIPMENT)],
            Mutation::Team => vec![keys::maintenance_teams()],
            Mutation::User => vec![keys::users(), keys::technicians()],
        }
    }
}

/// Identity scope for a bearer token; the token itself is never stored
pub fn scope_for(token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => {
            let digest = Sha256::digest(token.as_bytes());
            digest.iter().map(|b| format!("{:02x}", b)).collect()
        }
        _ => ANONYMOUS_SCOPE.to_string(),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub scope_entries: usize,
    pub scopes: usize,
}

pub struct QueryCache {
    conn: Connection,
    scope: String,
    path: Option<PathBuf>,
}

impl QueryCache {
    /// Default location under the user cache directory
    pub fn default_path() -> Option<PathBuf> {
        crate::core::config::cache_dir().map(|dir| dir.join(CACHE_FILE))
    }

    /// Open or create the cache database
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let needs_init = !path.exists();
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let mut cache = Self {
            conn,
            scope: ANONYMOUS_SCOPE.to_string(),
            path: Some(path.to_path_buf()),
        };

        if needs_init {
            cache.init_schema()?;
        } else {
            cache.migrate_schema_if_needed()?;
        }

        Ok(cache)
    }

    /// Throwaway cache; used when the on-disk cache cannot be opened
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        let mut cache = Self {
            conn,
            scope: ANONYMOUS_SCOPE.to_string(),
            path: None,
        };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&mut self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS responses (
                scope TEXT NOT NULL,
                key TEXT NOT NULL,
                body TEXT NOT NULL,
                fetched_at INTEGER NOT NULL,
                PRIMARY KEY (scope, key)
            );
            "#,
        )?;
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Entries are disposable, so an old layout is simply rebuilt
    fn migrate_schema_if_needed(&mut self) -> Result<(), CacheError> {
        let current_version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        if current_version < SCHEMA_VERSION {
            tracing::info!(from = current_version, to = SCHEMA_VERSION, "rebuilding response cache");
            self.conn.execute_batch(
                r#"
                DROP TABLE IF EXISTS responses;
                DROP TABLE IF EXISTS schema_version;
                "#,
            )?;
            self.init_schema()?;
        }
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Switch to the scope of the given bearer token
    pub fn set_identity(&mut self, token: Option<&str>) {
        self.scope = scope_for(token);
    }

    /// Cached body for `key` if younger than `ttl_secs`
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
        ttl_secs: u64,
    ) -> Result<Option<T>, CacheError> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT body, fetched_at FROM responses WHERE scope = ?1 AND key = ?2",
                params![self.scope, key.encode()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((body, fetched_at)) = row else {
            return Ok(None);
        };
        let age = Utc::now().timestamp().saturating_sub(fetched_at);
        if age < 0 || age as u64 >= ttl_secs {
            return Ok(None);
        }
        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<(), CacheError> {
        let body = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO responses (scope, key, body, fetched_at) VALUES (?1, ?2, ?3, ?4)",
            params![self.scope, key.encode(), body, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Return the cached value or run `fetch` and store its result.
    ///
    /// Cache failures are logged and never fail the command; fetch errors
    /// are passed through untouched and nothing is stored.
    pub fn fetch<T, E, F>(&self, key: &QueryKey, ttl_secs: u64, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        if ttl_secs > 0 {
            match self.get(key, ttl_secs) {
                Ok(Some(hit)) => {
                    tracing::debug!(key = %key, "cache hit");
                    return Ok(hit);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(key = %key, error = %e, "cache read failed"),
            }
        }

        let value = fetch()?;
        if ttl_secs > 0 {
            if let Err(e) = self.put(key, &value) {
                tracing::warn!(key = %key, error = %e, "cache write failed");
            }
        }
        Ok(value)
    }

    /// Drop every entry whose key starts with `prefix`, in all scopes
    pub fn invalidate_prefix(&self, prefix: &QueryKey) -> Result<usize, CacheError> {
        let removed = self.conn.execute(
            "DELETE FROM responses WHERE substr(key, 1, length(?1)) = ?1",
            params![prefix.encode()],
        )?;
        Ok(removed)
    }

    /// Drop everything cached for the current identity
    pub fn clear_scope(&self) -> Result<usize, CacheError> {
        let removed = self
            .conn
            .execute("DELETE FROM responses WHERE scope = ?1", params![self.scope])?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<usize, CacheError> {
        let removed = self.conn.execute("DELETE FROM responses", [])?;
        Ok(removed)
    }

    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        let scoped: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM responses WHERE scope = ?1",
            params![self.scope],
            |row| row.get(0),
        )?;
        let scopes: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT scope) FROM responses",
            [],
            |row| row.get(0),
        )?;
        Ok(CacheStats {
            total_entries: total as usize,
            scope_entries: scoped as usize,
            scopes: scopes as usize,
        })
    }
}

impl Invalidate for QueryCache {
    fn invalidate(&self, key: &QueryKey) {
        match self.invalidate_prefix(key) {
            Ok(removed) => tracing::info!(key = %key, removed, "invalidated"),
            Err(e) => tracing::warn!(key = %key, error = %e, "cache invalidation failed"),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Records invalidations instead of touching storage
    #[derive(Default)]
    pub struct RecordingInvalidator {
        pub keys: RefCell<Vec<QueryKey>>,
    }

    impl Invalidate for RecordingInvalidator {
        fn invalidate(&self, key: &QueryKey) {
            self.keys.borrow_mut().push(key.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seeded() -> QueryCache {
        let cache = QueryCache::open_in_memory().unwrap();
        cache.put(&QueryKey::root("equipment"), &vec![1, 2]).unwrap();
        cache.put(&keys::equipment(4), &"lathe").unwrap();
        cache.put(&keys::equipment_requests(4), &vec![9]).unwrap();
        cache.put(&keys::maintenance_teams(), &Vec::<u8>::new()).unwrap();
        cache
    }

    #[test]
    fn test_key_prefix_respects_part_boundaries() {
        let equipment = QueryKey::root("equipment");
        assert!(equipment.is_prefix_of(&keys::equipment(4)));
        assert!(!equipment.is_prefix_of(&keys::equipment_requests(4)));
        assert!(keys::equipment_requests(4).encode().starts_with("equipment-requests\u{1f}"));
    }

    #[test]
    fn test_invalidate_by_prefix() {
        let cache = seeded();
        let removed = cache.invalidate_prefix(&QueryKey::root("equipment")).unwrap();
        assert_eq!(removed, 2);

        assert!(cache.get::<Vec<u8>>(&keys::equipment_requests(4), 60).unwrap().is_some());
        assert!(cache.get::<String>(&keys::equipment(4), 60).unwrap().is_none());
        assert!(cache.get::<Vec<u8>>(&keys::maintenance_teams(), 60).unwrap().is_some());
    }

    #[test]
    fn test_entries_are_scoped_per_identity() {
        let mut cache = QueryCache::open_in_memory().unwrap();
        cache.set_identity(Some("token-a"));
        cache.put(&keys::users(), &vec!["alice"]).unwrap();

        cache.set_identity(Some("token-b"));
        assert!(cache.get::<Vec<String>>(&keys::users(), 60).unwrap().is_none());

        cache.set_identity(Some("token-a"));
        assert_eq!(
            cache.get::<Vec<String>>(&keys::users(), 60).unwrap(),
            Some(vec!["alice".to_string()])
        );
    }

    #[test]
    fn test_scope_hides_token() {
        let scope = scope_for(Some("secret-token"));
        assert_eq!(scope.len(), 64);
        assert!(!scope.contains("secret"));
        assert_eq!(scope_for(None), "anonymous");
        assert_eq!(scope_for(Some("")), "anonymous");
    }

    #[test]
    fn test_zero_ttl_is_always_stale() {
        let cache = QueryCache::open_in_memory().unwrap();
        cache.put(&keys::reports(), &1u32).unwrap();
        assert!(cache.get::<u32>(&keys::reports(), 0).unwrap().is_none());
        assert_eq!(cache.get::<u32>(&keys::reports(), 60).unwrap(), Some(1));
    }

    #[test]
    fn test_fetch_uses_cache_until_invalidated() {
        let cache = QueryCache::open_in_memory().unwrap();
        let mut calls = 0;

        let first: Result<u32, String> = cache.fetch(&keys::reports(), 60, || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(first.unwrap(), 7);

        let second: Result<u32, String> = cache.fetch(&keys::reports(), 60, || {
            calls += 1;
            Ok(8)
        });
        assert_eq!(second.unwrap(), 7);
        assert_eq!(calls, 1);

        cache.invalidate(&keys::reports());
        let third: Result<u32, String> = cache.fetch(&keys::reports(), 60, || {
            calls += 1;
            Ok(8)
        });
        assert_eq!(third.unwrap(), 8);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_fetch_errors_are_not_cached() {
        let cache = QueryCache::open_in_memory().unwrap();
        let failed: Result<u32, &str> = cache.fetch(&keys::users(), 60, || Err("boom"));
        assert_eq!(failed.unwrap_err(), "boom");
        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn test_mutation_map() {
        let request = Mutation::Request.invalidates();
        assert!(request.contains(&keys::maintenance_requests()));
        assert!(request.contains(&keys::calendar_events()));
        assert!(request.contains(&QueryKey::root("equipment-requests")));

        assert_eq!(Mutation::User.invalidates(), vec![keys::users(), keys::technicians()]);
        assert_eq!(Mutation::Team.invalidates(), vec![keys::maintenance_teams()]);
    }

    #[test]
    fn test_open_creates_file_and_reopens() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("cache.db");

        {
            let cache = QueryCache::open(&path).unwrap();
            cache.put(&keys::technicians(), &vec![3]).unwrap();
        }
        assert!(path.exists());

        let cache = QueryCache::open(&path).unwrap();
        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.scope_entries, 1);
        assert_eq!(cache.clear().unwrap(), 1);
    }

    #[test]
    fn test_clear_scope_keeps_other_identities() {
        let mut cache = QueryCache::open_in_memory().unwrap();
        cache.set_identity(Some("a"));
        cache.put(&keys::users(), &1u8).unwrap();
        cache.set_identity(Some("b"));
        cache.put(&keys::users(), &2u8).unwrap();

        assert_eq!(cache.clear_scope().unwrap(), 1);
        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.scopes, 1);
    }
}
