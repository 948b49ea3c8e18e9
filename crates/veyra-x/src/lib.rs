//! X (Twitter) API v2 client and the call-rate limiter that gates it.

pub mod client;
pub mod error;
pub mod rate_limit;
pub mod types;

pub use client::{XClient, DEFAULT_BASE_URL};
pub use error::XApiError;
pub use rate_limit::RateLimiter;
pub use types::{CreatedPost, FollowersPage, RecentPostsQuery, XPost, XUser};
