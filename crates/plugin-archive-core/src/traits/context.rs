//! Request context providers.

use crate::UserId;
use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Source of the user on whose behalf a request runs.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::traits::UserProvider;
/// use plugin_archive_core::UserId;
///
/// #[derive(Debug)]
/// struct Anonymous;
///
/// impl UserProvider for Anonymous {
///     fn current_user(&self) -> Option<UserId> {
///         None
///     }
/// }
///
/// assert!(Anonymous.current_user().is_none());
/// ```
pub trait UserProvider: Send + Sync {
    /// Returns the current user, or `None` when the request is anonymous.
    fn current_user(&self) -> Option<UserId>;
}
