//! Session cookie configuration.
//!
//! Admin sessions live entirely in an encrypted cookie, so the signing key
//! and cookie attributes are security relevant. Release builds insist on
//! explicit settings; debug builds fall back to permissive defaults with a
//! warning so local development needs no secrets.
//!
//! | Variable                  | Meaning                                  |
//! |---------------------------|------------------------------------------|
//! | `SESSION_KEY_FILE`        | key material, at least 64 bytes          |
//! | `SESSION_COOKIE_SECURE`   | mark the cookie `Secure`                 |
//! | `SESSION_SAMESITE`        | `Strict`, `Lax` or `None`                |
//! | `SESSION_ALLOW_EPHEMERAL` | permit a random key when the file is missing |

use std::path::{Path, PathBuf};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use cap_std::{ambient_authority, fs::Dir};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

/// Environment variable naming the key file.
pub const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
/// Environment variable toggling the `Secure` attribute.
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
/// Environment variable selecting the `SameSite` policy.
pub const SAMESITE_ENV: &str = "SESSION_SAMESITE";
/// Environment variable permitting a throwaway key.
pub const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const DEFAULT_KEY_FILE: &str = "/var/run/secrets/session_key";
const MIN_KEY_BYTES: usize = 64;
const FINGERPRINT_BYTES: usize = 8;
const BOOL_VALUES: &str = "1|0|true|false|yes|no";
const SAMESITE_VALUES: &str = "Strict|Lax|None";

/// Session cookie name.
pub const SESSION_COOKIE: &str = "site_session";
/// Lifetime of an idle admin session cookie.
pub const SESSION_TTL_HOURS: i64 = 8;

/// How strictly the environment is validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Defaults with warnings.
    Debug,
    /// Every toggle must be present and valid.
    Release,
}

impl BuildMode {
    /// Mode matching the current compilation profile.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` attribute.
    pub same_site: SameSite,
    /// Short, non-secret identifier of `key` for start-up logs.
    pub fingerprint: String,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("cookie_secure", &self.cookie_secure)
            .field("same_site", &self.same_site)
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// Invalid or missing session configuration.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    /// Variable required in release builds is unset.
    #[error("{name} must be set")]
    Missing { name: &'static str },
    /// Variable holds an unrecognised value.
    #[error("{name}={value:?} is invalid; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Key file unreadable and no ephemeral fallback permitted.
    #[error("cannot read session key {path}: {source}")]
    KeyUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Key file shorter than the minimum.
    #[error("session key {path} holds {length} bytes; at least {MIN_KEY_BYTES} are required")]
    KeyTooShort { path: PathBuf, length: usize },
    /// `SameSite=None` without `Secure`.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    SameSiteNoneWithoutSecure,
    /// Ephemeral keys requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL is not permitted in release builds")]
    EphemeralInRelease,
}

impl SessionConfigError {
    fn invalid(name: &'static str, value: &str, expected: &'static str) -> Self {
        Self::Invalid {
            name,
            value: value.to_owned(),
            expected,
        }
    }
}

/// Read and validate the session settings.
///
/// # Examples
/// ```
/// use mockable::MockEnv;
/// use site_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_ALLOW_EPHEMERAL" => Some("1".to_owned()),
///     "SESSION_KEY_FILE" => Some("/nonexistent/key".to_owned()),
///     _ => None,
/// });
/// let settings = session_settings_from_env(&env, BuildMode::Debug).unwrap();
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.fingerprint.len(), 16);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = toggle(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = toggle(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralInRelease);
    }
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_FILE.to_owned()),
    );
    let key = match read_key_material(&path) {
        Ok(bytes) if bytes.len() < MIN_KEY_BYTES && mode == BuildMode::Release => {
            return Err(SessionConfigError::KeyTooShort {
                length: bytes.len(),
                path,
            });
        }
        Ok(bytes) => Key::derive_from(&bytes),
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "session key unreadable; using an ephemeral key");
            Key::generate()
        }
        Err(source) => return Err(SessionConfigError::KeyUnreadable { path, source }),
    };
    Ok(SessionSettings {
        fingerprint: key_fingerprint(&key),
        key,
        cookie_secure,
        same_site,
    })
}

/// Session middleware: private (encrypted) cookie, `HttpOnly`, persistent
/// for [`SESSION_TTL_HOURS`].
#[must_use]
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(settings.same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)))
        .build()
}

/// First eight bytes of the SHA-256 of the signing key, hex encoded.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}

fn read_key_material(path: &Path) -> std::io::Result<Zeroizing<Vec<u8>>> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "key path has no file name"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(name).map(Zeroizing::new)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    fallback: bool,
) -> Result<bool, SessionConfigError> {
    let outcome = match env.string(name) {
        None => Err(SessionConfigError::Missing { name }),
        Some(raw) => parse_bool(&raw).ok_or_else(|| SessionConfigError::invalid(name, &raw, BOOL_VALUES)),
    };
    match (outcome, mode) {
        (Ok(flag), _) => Ok(flag),
        (Err(err), BuildMode::Debug) => {
            warn!(%err, fallback, "using default session toggle");
            Ok(fallback)
        }
        (Err(err), BuildMode::Release) => Err(err),
    }
}

fn same_site<E: Env>(env: &E, mode: BuildMode, secure: bool) -> Result<SameSite, SessionConfigError> {
    let fallback = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    let parsed = match env.string(SAMESITE_ENV) {
        None => Err(SessionConfigError::Missing { name: SAMESITE_ENV }),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" if secure => Ok(SameSite::None),
            "none" => Err(SessionConfigError::SameSiteNoneWithoutSecure),
            _ => Err(SessionConfigError::invalid(SAMESITE_ENV, &raw, SAMESITE_VALUES)),
        },
    };
    match (parsed, mode) {
        (Ok(policy), _) => Ok(policy),
        (Err(err), BuildMode::Debug) => {
            warn!(%err, ?fallback, "using default SameSite policy");
            Ok(fallback)
        }
        (Err(err), BuildMode::Release) => Err(err),
    }
}
