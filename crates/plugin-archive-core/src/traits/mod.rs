//! Collaborator traits for the plugin archive service.
//!
//! The handlers own no state of their own. Everything they need from the
//! outside world comes through these seams:
//!
//! - `store` - plugin persistence keyed by [`PluginName`](crate::PluginName)
//! - `detector` - media type detection for outgoing bodies
//! - `context` - current time and current user
//!
//! All traits are synchronous and `Send + Sync` so one instance can be shared
//! across the host's request threads behind an `Arc`.

mod context;
mod detector;
mod store;

pub use context::{Clock, UserProvider};
pub use detector::ContentTypeDetector;
pub use store::PluginStore;
