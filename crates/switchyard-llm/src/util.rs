//! Helpers shared by providers: key masking and error scrubbing.

/// Keys at or below this length are fully masked
const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 8;

/// Characters kept visible at each end of a masked key
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Provider errors longer than this are truncated before surfacing
const MAX_ERROR_LEN: usize = 300;

/// Mask an API key for logs.
///
/// ```
/// use switchyard_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("sk-1234567890abcdef"), "sk-1...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY {
        return "****".to_string();
    }
    let head: String = chars[..KEY_MASK_VISIBLE_CHARS].iter().collect();
    let tail: String = chars[chars.len() - KEY_MASK_VISIBLE_CHARS..].iter().collect();
    format!("{head}...{tail}")
}

/// Truncate to at most `max_bytes` without splitting a UTF-8 character.
#[must_use]
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Rewrite a raw provider error into something safe to log and return.
///
/// Credential problems, quota problems and upstream faults collapse into
/// fixed messages so keys or account details never leak.
#[must_use]
pub fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("api_key")
        || lower.contains("apikey")
        || lower.contains("invalid key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
        || lower.contains("bearer")
    {
        return "API authentication error. Please check your API key configuration.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") {
        return "API rate limit exceeded. Please try again later.".to_string();
    }

    if lower.contains("internal") || lower.contains("server error") {
        return "API server error. Please try again later.".to_string();
    }

    if error.len() > MAX_ERROR_LEN {
        format!("{}...(truncated)", truncate_safe(error, MAX_ERROR_LEN))
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key_long() {
        let masked = mask_api_key("sk-1234567890abcdefghij");
        assert_eq!(masked, "sk-1...ghij");
        assert!(!masked.contains("567890"));
    }

    #[test]
    fn test_mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("12345678"), "****");
        assert_eq!(mask_api_key(""), "****");
    }

    #[test]
    fn test_sanitize_auth_error() {
        assert_eq!(
            sanitize_api_error("Incorrect API key provided: sk-abc"),
            "API authentication error. Please check your API key configuration."
        );
    }

    #[test]
    fn test_sanitize_rate_limit() {
        assert!(sanitize_api_error("Rate limit reached for gpt-4o-mini").contains("rate limit"));
    }

    #[test]
    fn test_sanitize_passthrough_and_truncate() {
        assert_eq!(sanitize_api_error("connection reset"), "connection reset");
        let long = "x".repeat(500);
        let out = sanitize_api_error(&long);
        assert!(out.ends_with("...(truncated)"));
        assert!(out.len() < 500);
    }

    #[test]
    fn test_truncate_safe_multibyte() {
        let s = "não";
        // 'ã' is two bytes; cutting at 2 must back off to 1
        assert_eq!(truncate_safe(s, 2), "n");
        assert_eq!(truncate_safe(s, 10), "não");
    }
}
