//! Tradewinds Identity - session and seller-status resolution.
//!
//! Two independent resolvers that every dashboard surface consumes to
//! decide what to render:
//!
//! - [`SessionResolver`] answers "who is looking at the dashboard" by
//!   scanning an injected [`Roster`] for its admin record after a fixed
//!   delay.
//! - [`SellerStatusResolver`] answers "is this email registered as a
//!   seller" by querying the users service, defaulting to `false` on any
//!   failure.
//!
//! The resolvers never interact with each other. Each owns its state
//! exclusively, publishes it through a `tokio::sync::watch` channel, and
//! cancels its pending work (timer or in-flight request) when dropped or
//! when its input is superseded.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod models;
pub mod roster;
pub mod seller;
pub mod session;

pub use config::{ConfigError, IdentityConfig};
pub use models::UserRecord;
pub use roster::Roster;
pub use seller::{SellerStatus, SellerStatusResolver};
pub use session::{SessionResolver, SessionState};
