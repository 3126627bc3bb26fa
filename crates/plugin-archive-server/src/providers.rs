//! Clock and user providers.

use chrono::{DateTime, Utc};
use plugin_archive_core::UserId;
use plugin_archive_core::traits::{Clock, UserProvider};

/// Environment variables consulted by [`EnvUserProvider::default`], in order.
pub const DEFAULT_USER_VARS: &[&str] = &["PLUGIN_ARCHIVE_USER", "USER", "USERNAME"];

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Always reports the same user, or nobody.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::traits::UserProvider;
/// use plugin_archive_server::StaticUserProvider;
///
/// assert_eq!(StaticUserProvider::new("admin").current_user().unwrap().as_str(), "admin");
/// assert!(StaticUserProvider::anonymous().current_user().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticUserProvider {
    user: Option<UserId>,
}

impl StaticUserProvider {
    /// Reports `user` for every request.
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: Some(UserId::new(user)),
        }
    }

    /// Reports no user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }
}

impl UserProvider for StaticUserProvider {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

/// Reads the user from the first set, non-blank environment variable.
#[derive(Debug, Clone)]
pub struct EnvUserProvider {
    vars: Vec<String>,
}

impl EnvUserProvider {
    /// Consults `vars` in order.
    #[must_use]
    pub fn new<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for EnvUserProvider {
    fn default() -> Self {
        Self::new(DEFAULT_USER_VARS.iter().copied())
    }
}

impl UserProvider for EnvUserProvider {
    fn current_user(&self) -> Option<UserId> {
        self.vars.iter().find_map(|var| {
            std::env::var(var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(UserId::new)
        })
    }
}
