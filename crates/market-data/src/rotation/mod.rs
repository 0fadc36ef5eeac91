//! Rotating cursor over a pool of provider API keys.
//!
//! Free-tier quotas are per key, so the fetcher spreads requests over every
//! configured credential and walks to the next one whenever a key is
//! throttled or the transport fails. The cursor lives for the process only;
//! a restart begins again at the first key.

use std::sync::Mutex;
use std::sync::MutexGuard;

use log::warn;

const API_KEYS_ENV: &str = "ALPHA_VANTAGE_API_KEYS";
const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// A single provider API key.
///
/// Blank entries are representable on purpose: a placeholder slot in the
/// configured list stays in the pool and is skipped at use time, which keeps
/// cursor positions stable as operators edit the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this credential can be sent to the provider at all.
    pub fn is_usable(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

/// Shared rotation state over an ordered credential pool.
///
/// `current` and `advance` are separate operations so the caller decides when
/// a failure costs a rotation. The cursor wraps modulo the pool length and is
/// shared across callers; exhaustion is judged per call site against an
/// attempt count, not against the cursor.
#[derive(Debug)]
pub struct KeyRotator {
    credentials: Vec<ApiCredential>,
    cursor: Mutex<usize>,
}

impl KeyRotator {
    pub fn new(credentials: Vec<ApiCredential>) -> Self {
        Self {
            credentials,
            cursor: Mutex::new(0),
        }
    }

    /// Reads the credential pool from the environment.
    ///
    /// `ALPHA_VANTAGE_API_KEYS` holds a comma-separated list; entries are
    /// trimmed but blank entries are kept as placeholder slots. When it is
    /// unset or entirely blank, a single `ALPHA_VANTAGE_API_KEY` is used
    /// instead.
    pub fn from_env() -> Self {
        let credentials = std::env::var(API_KEYS_ENV)
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| raw.split(',').map(|key| ApiCredential::new(key.trim())).collect())
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|raw| !raw.trim().is_empty())
                    .map(|key| vec![ApiCredential::new(key.trim())])
            })
            .unwrap_or_default();

        if credentials.is_empty() {
            warn!(
                "No provider API keys configured; set {} or {}",
                API_KEYS_ENV, API_KEY_ENV
            );
        }

        Self::new(credentials)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// The credential under the cursor, or `None` for an empty pool.
    pub fn current(&self) -> Option<ApiCredential> {
        let cursor = self.lock_cursor();
        self.credentials.get(*cursor).cloned()
    }

    /// Moves the cursor to the next credential, wrapping at the end of the
    /// pool. A no-op when the pool is empty.
    pub fn advance(&self) {
        if self.credentials.is_empty() {
            return;
        }
        let mut cursor = self.lock_cursor();
        *cursor = (*cursor + 1) % self.credentials.len();
    }

    /// True once a call site has burned as many attempts as there are keys.
    pub fn exhausted(&self, attempts_so_far: usize) -> bool {
        attempts_so_far >= self.credentials.len()
    }

    /// Current cursor position, for diagnostics.
    pub fn position(&self) -> usize {
        *self.lock_cursor()
    }

    fn lock_cursor(&self) -> MutexGuard<'_, usize> {
        self.cursor.lock().unwrap_or_else(|poisoned| {
            warn!("Key rotator cursor mutex poisoned; recovering");
            poisoned.into_inner()
        })
    }
}
