//! Cookie jar for the backend the client talks to.
//!
//! The refresh credential is an httpOnly cookie set by the login endpoint.
//! A browser keeps it across reloads; this jar does the same by optionally
//! mirroring its contents to a JSON file in the cache directory.
//!
//! Cookie semantics (domain, path, expiry) come from `cookie_store`; this
//! wrapper only adds the file mirror.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::MutexGuard;

use anyhow::{Context, Result};
use reqwest::cookie::CookieStore as ReqwestCookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use reqwest_cookie_store::CookieStoreMutex;
use tracing::{debug, warn};

/// Cookie file name in cache directory
const COOKIE_FILE: &str = "cookies.json";

pub struct CookieJar {
    store: CookieStoreMutex,
    path: Option<PathBuf>,
}

impl CookieJar {
    /// Jar that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            store: CookieStoreMutex::new(cookie_store::CookieStore::default()),
            path: None,
        }
    }

    /// Jar persisted to `<cache_dir>/cookies.json`, loading what is already there
    pub fn persistent(cache_dir: PathBuf) -> Result<Self> {
        let path = cache_dir.join(COOKIE_FILE);
        let store = if path.exists() {
            let file = File::open(&path).context("Failed to open cookie file")?;
            // Session cookies carry no expiry but still have to survive a restart
            cookie_store::serde::json::load_all(BufReader::new(file))
                .map_err(|e| anyhow::anyhow!("Failed to parse cookie file: {}", e))?
        } else {
            cookie_store::CookieStore::default()
        };
        Ok(Self {
            store: CookieStoreMutex::new(store),
            path: Some(path),
        })
    }

    /// Value of an unexpired cookie by name
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock()
            .iter_unexpired()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string())
    }

    fn lock(&self) -> MutexGuard<'_, cookie_store::CookieStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self) {
        let Some(ref path) = self.path else {
            return;
        };
        if let Err(e) = Self::write_file(path, &self.lock()) {
            warn!(error = %e, "Failed to persist cookies");
        }
    }

    fn write_file(path: &Path, store: &cookie_store::CookieStore) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
        }
        let file = File::create(path).context("Failed to write cookie file")?;
        let mut writer = BufWriter::new(file);
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(store, &mut writer)
            .map_err(|e| anyhow::anyhow!("Failed to write cookie file: {}", e))?;
        Ok(())
    }
}

impl ReqwestCookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&HeaderValue> = cookie_headers.collect();
        if headers.is_empty() {
            return;
        }
        debug!(count = headers.len(), url = %url, "Storing cookies from response");
        ReqwestCookieStore::set_cookies(&self.store, &mut headers.into_iter(), url);
        self.persist();
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        ReqwestCookieStore::cookies(&self.store, url)
    }
}
