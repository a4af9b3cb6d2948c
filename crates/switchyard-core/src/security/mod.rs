//! Security Module
//!
//! - Suspicious-content pre-filter used by the router
//! - HTML sanitization of incoming messages

pub mod sanitize;
pub mod suspicious;

pub use sanitize::sanitize_user_input;
pub use suspicious::{
    PatternCategory, PatternLanguage, SuspiciousFilter, SuspiciousFilterConfig, SuspiciousPattern,
    SUSPICIOUS_PATTERNS,
};
