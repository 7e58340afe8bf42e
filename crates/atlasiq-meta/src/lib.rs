//! Rate-limited Meta Graph API clients for Facebook and Instagram.
//!
//! Both clients share one [`RateLimiter`] per app credential, map the
//! platform-specific payloads into the common [`atlasiq_core::Post`] and
//! [`atlasiq_core::Place`] shapes, and never retry on their own. Callers
//! that want retries wrap calls in [`retry_with_backoff`].

pub mod client;
pub mod error;
pub mod facebook;
pub mod instagram;
pub mod rate_limit;
pub mod retry;
pub mod source;

mod response;

pub use client::GraphClient;
pub use error::PlatformError;
pub use facebook::FacebookClient;
pub use instagram::InstagramClient;
pub use rate_limit::RateLimiter;
pub use retry::{is_retriable, retry_with_backoff};
pub use source::PlatformSource;
