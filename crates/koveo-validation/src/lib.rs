//! Koveo Validation: sanitizers, field validators, password policy and
//! rate limiting applied to untrusted input at the API boundary.

pub mod config;
pub mod error;
pub mod format;
pub mod gate;
pub mod password;
mod patterns;
pub mod rate_limit;
pub mod sanitize;
pub mod security;
pub mod upload;
pub mod verdict;

pub use config::{RateLimitConfig, ValidationConfig};
pub use error::ValidationError;
pub use gate::InputGate;
pub use rate_limit::{InMemoryRateLimitStore, RateLimitDecision, RateLimitStore, RateLimiter};
pub use security::{MemorySink, SecuritySignal, SecuritySink, TracingSink};
pub use verdict::Verdict;
