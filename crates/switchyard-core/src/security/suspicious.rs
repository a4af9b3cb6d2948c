//! Suspicious-content pre-filter for the router
//!
//! A fixed substring table of prompt-injection phrases (English and
//! Portuguese), code-execution keywords and URL or script schemes. A match
//! does not reject the query; the router sends it to the knowledge agent,
//! which cannot execute instructions. This is a routing bias, not a
//! security boundary.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::logging::truncate_chars;

// ============================================================================
// Pattern Table
// ============================================================================

/// What a pattern is trying to catch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    /// Attempts to override the assistant's instructions
    PromptInjection,
    /// Shell or interpreter keywords
    CodeExecution,
    /// Links and script-bearing URI schemes
    UrlScheme,
}

/// Language a phrase is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternLanguage {
    /// English phrase
    English,
    /// Portuguese phrase
    Portuguese,
    /// Language-neutral token (code, scheme)
    Any,
}

/// A lower-case substring that marks a query as suspicious
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuspiciousPattern {
    /// Pattern identifier
    pub id: &'static str,
    /// Lower-case substring
    pub pattern: &'static str,
    /// Category
    pub category: PatternCategory,
    /// Language
    pub language: PatternLanguage,
}

macro_rules! pattern {
    ($id:literal, $pattern:literal, $category:ident, $language:ident) => {
        SuspiciousPattern {
            id: $id,
            pattern: $pattern,
            category: PatternCategory::$category,
            language: PatternLanguage::$language,
        }
    };
}

/// Built-in patterns
pub const SUSPICIOUS_PATTERNS: &[SuspiciousPattern] = &[
    // Prompt injection (English)
    pattern!("ignore_instructions", "ignore previous instructions", PromptInjection, English),
    pattern!("system_prompt", "system prompt", PromptInjection, English),
    pattern!("you_are_now", "you are now", PromptInjection, English),
    pattern!("act_as", "act as", PromptInjection, English),
    pattern!("pretend_to_be", "pretend to be", PromptInjection, English),
    // Prompt injection (Portuguese)
    pattern!("ignore_instructions_pt", "ignore as instruções anteriores", PromptInjection, Portuguese),
    pattern!("forget_everything_pt", "esqueça tudo", PromptInjection, Portuguese),
    pattern!("system_prompt_pt", "prompt do sistema", PromptInjection, Portuguese),
    pattern!("you_are_now_pt", "você agora é", PromptInjection, Portuguese),
    pattern!("act_as_pt", "aja como", PromptInjection, Portuguese),
    // Code execution
    pattern!("execute_command", "execute command", CodeExecution, English),
    pattern!("run_command", "run command", CodeExecution, English),
    pattern!("import_os", "import os", CodeExecution, Any),
    pattern!("subprocess", "subprocess", CodeExecution, Any),
    pattern!("eval_call", "eval(", CodeExecution, Any),
    // URL and script schemes
    pattern!("http_url", "http://", UrlScheme, Any),
    pattern!("https_url", "https://", UrlScheme, Any),
    pattern!("file_url", "file://", UrlScheme, Any),
    // Sanitizing strips closed script tags, so after it this only sees unterminated fragments
    pattern!("script_tag", "<script", UrlScheme, Any),
    pattern!("javascript_scheme", "javascript:", UrlScheme, Any),
    pattern!("data_html", "data:text/html", UrlScheme, Any),
];

// ============================================================================
// Configuration
// ============================================================================

/// Filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspiciousFilterConfig {
    /// Run the filter at all
    pub enabled: bool,
    /// Additional substrings, matched case-insensitively
    pub extra_patterns: Vec<String>,
}

impl Default for SuspiciousFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_patterns: Vec::new(),
        }
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Applies the pattern table to queries
#[derive(Debug, Clone)]
pub struct SuspiciousFilter {
    enabled: bool,
    patterns: Vec<SuspiciousPattern>,
    extra_patterns: Vec<String>,
}

impl Default for SuspiciousFilter {
    fn default() -> Self {
        Self::new(SuspiciousFilterConfig::default())
    }
}

impl SuspiciousFilter {
    /// Build from configuration
    #[must_use]
    pub fn new(config: SuspiciousFilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            patterns: SUSPICIOUS_PATTERNS.to_vec(),
            extra_patterns: config
                .extra_patterns
                .into_iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// A filter that never matches
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(SuspiciousFilterConfig {
            enabled: false,
            extra_patterns: Vec::new(),
        })
    }

    /// Return the first pattern contained in `query`.
    #[must_use]
    pub fn find_match(&self, query: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let normalized = query.trim().to_lowercase();

        let hit = self
            .patterns
            .iter()
            .find(|p| normalized.contains(p.pattern))
            .map(|p| p.pattern.to_string())
            .or_else(|| {
                self.extra_patterns
                    .iter()
                    .find(|p| normalized.contains(p.as_str()))
                    .cloned()
            });

        if let Some(pattern) = &hit {
            warn!(
                pattern = %pattern,
                query_preview = truncate_chars(query, 50),
                "Suspicious content detected"
            );
        }
        hit
    }

    /// True if any pattern matches
    #[must_use]
    pub fn is_suspicious(&self, query: &str) -> bool {
        self.find_match(query).is_some()
    }
}
