//! Cookie store capability
//!
//! The builder reads its bearer token from a cookie and can write cookies
//! back. Both go through [`CookieStore`], so the backing jar is injected
//! rather than being ambient state.

use std::borrow::Cow;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

use crate::error::{RequestError, Result};

/// Key/value access to a cookie jar. `None` means the cookie is absent.
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    /// Write `name=value` expiring `ttl` from now, scoped to path `/`.
    fn set(&self, name: &str, value: &str, ttl: Duration);
}

/// Day counts beyond this are saturated; it already reaches past year 9999.
const MAX_TTL_DAYS: i64 = 3_700_000;

/// TTL for a "days till expiration" count, saturating on huge counts.
pub fn days(days: i64) -> Duration {
    Duration::try_days(days.clamp(-MAX_TTL_DAYS, MAX_TTL_DAYS)).unwrap_or_else(Duration::zero)
}

/// Latest expiry a cookie date can express with a four-digit year.
fn latest_expiry() -> DateTime<Utc> {
    DateTime::from_timestamp(253_402_300_799, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// `now + ttl`, clamped to the range a cookie date can express.
/// `ttl` of `None` stands for an offset too large to represent.
fn expiry_after(now: DateTime<Utc>, ttl: Option<Duration>, backwards: bool) -> DateTime<Utc> {
    match ttl.and_then(|ttl| now.checked_add_signed(ttl)) {
        Some(expires) => expires.clamp(DateTime::UNIX_EPOCH, latest_expiry()),
        None if backwards => DateTime::UNIX_EPOCH,
        None => latest_expiry(),
    }
}

/// Look up `name` in a `"a=b; c=d"` cookie string.
///
/// The string is percent-decoded first. Entries are split on `;` and leading
/// spaces are dropped; the first entry starting with `name=` gives the value,
/// which runs to the end of that entry.
pub fn parse_cookie(cookie_string: &str, name: &str) -> Option<String> {
    let key = format!("{}=", name);
    let decoded = decode(cookie_string);
    decoded
        .split(';')
        .map(|entry| entry.trim_start_matches(' '))
        .find_map(|entry| entry.strip_prefix(key.as_str()))
        .map(str::to_string)
}

fn decode(input: &str) -> Cow<'_, str> {
    match urlencoding::decode(input) {
        Ok(decoded) => decoded,
        Err(_) => {
            let bytes = urlencoding::decode_binary(input.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// `name=value;expires=<UTC date>;path=/`
///
/// Dates past year 9999 are written as the last second of 9999.
pub fn format_set_cookie(name: &str, value: &str, expires: DateTime<Utc>) -> String {
    let expires = expires.min(latest_expiry());
    format!(
        "{}={};expires={};path=/",
        name,
        value,
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredCookie {
    name: String,
    value: String,
    path: String,
    expires: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }
}

/// In-memory jar with `document.cookie` semantics: writes are single
/// `Set-Cookie`-style assignments, reads see every live cookie as one
/// concatenated string.
#[derive(Debug, Default)]
pub struct DocumentCookieJar {
    cookies: Mutex<Vec<StoredCookie>>,
}

impl DocumentCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a jar from a `"a=b; c=d"` string. Entries without `=` are skipped.
    pub fn from_cookie_string(cookie_string: &str) -> Self {
        let jar = Self::new();
        for entry in cookie_string.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if let Err(e) = jar.assign(entry) {
                log::debug!("skipping cookie entry '{}': {}", entry, e);
            }
        }
        jar
    }

    /// Apply one assignment such as `token=abc;expires=...;path=/`.
    ///
    /// An assignment whose expiry is already past removes the cookie.
    pub fn assign(&self, assignment: &str) -> Result<()> {
        let mut parts = assignment.split(';');
        let pair = parts.next().unwrap_or_default().trim();
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            RequestError::Cookie(format!("Invalid cookie assignment: '{}'", assignment))
        })?;

        let mut cookie = StoredCookie {
            name: name.trim().to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            expires: None,
        };

        for attribute in parts {
            let (key, val) = match attribute.split_once('=') {
                Some((key, val)) => (key.trim(), val.trim()),
                None => (attribute.trim(), ""),
            };
            match key.to_ascii_lowercase().as_str() {
                "expires" => {
                    let expires = DateTime::parse_from_rfc2822(val).map_err(|e| {
                        RequestError::Cookie(format!("Invalid expires '{}': {}", val, e))
                    })?;
                    cookie.expires = Some(expires.with_timezone(&Utc));
                }
                "max-age" => {
                    let seconds: i64 = val.parse().map_err(|_| {
                        RequestError::Cookie(format!("Invalid max-age '{}'", val))
                    })?;
                    cookie.expires = Some(expiry_after(
                        Utc::now(),
                        Duration::try_seconds(seconds),
                        seconds < 0,
                    ));
                }
                "path" if !val.is_empty() => cookie.path = val.to_string(),
                _ => {}
            }
        }

        let now = Utc::now();
        let mut cookies = self.lock();
        cookies.retain(|c| !c.is_expired(now));
        let existing = cookies
            .iter()
            .position(|c| c.name == cookie.name && c.path == cookie.path);

        match (existing, cookie.is_expired(now)) {
            (Some(index), true) => {
                cookies.remove(index);
            }
            (Some(index), false) => cookies[index] = cookie,
            (None, true) => {}
            (None, false) => cookies.push(cookie),
        }
        Ok(())
    }

    /// Every live cookie as `"name=value; name2=value2"`.
    pub fn cookie_string(&self) -> String {
        let now = Utc::now();
        self.lock()
            .iter()
            .filter(|c| !c.is_expired(now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StoredCookie>> {
        self.cookies.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CookieStore for DocumentCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        parse_cookie(&self.cookie_string(), name)
    }

    fn set(&self, name: &str, value: &str, ttl: Duration) {
        let expires = expiry_after(Utc::now(), Some(ttl), ttl < Duration::zero());
        let assignment = format_set_cookie(name, value, expires);
        if let Err(e) = self.assign(&assignment) {
            log::warn!("failed to set cookie '{}': {}", name, e);
        }
    }
}
