//! Math solver
//!
//! The LLM evaluates the expression; this module only gates its answer.
//! On success the model's raw text is returned unchanged.

use crate::error::MathError;
use crate::logging::preview;
use crate::prompts::{math_message, MATH_SYSTEM_PROMPT};
use regex::Regex;
use std::sync::OnceLock;
use switchyard_llm::LlmClient;
use tracing::{error, info};

/// Largest accepted magnitude
pub const MAX_RESULT_VALUE: f64 = 1e10;

const SPECIAL_LITERALS: &[&str] = &["nan", "inf", "-inf", "infinity", "-infinity"];

fn non_numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.\-eE]").unwrap())
}

/// Parse the model's answer into a float, or explain why it is unusable.
///
/// # Errors
///
/// `EmptyOrError`, `NoNumericData` or `ConversionFailed`.
pub fn parse_math_result(raw: &str) -> Result<f64, MathError> {
    // Only an exact empty or "error" reply counts; padded text falls through
    if raw.is_empty() || raw.eq_ignore_ascii_case("error") {
        return Err(MathError::EmptyOrError);
    }
    let text = raw.trim();

    let lower = text.to_lowercase();
    if SPECIAL_LITERALS.contains(&lower.as_str()) {
        return Ok(match lower.as_str() {
            "nan" => f64::NAN,
            "-inf" | "-infinity" => f64::NEG_INFINITY,
            _ => f64::INFINITY,
        });
    }

    let cleaned = non_numeric_re().replace_all(text, "");
    if matches!(cleaned.as_ref(), "" | "-" | ".") {
        return Err(MathError::NoNumericData(text.to_string()));
    }

    cleaned
        .parse::<f64>()
        .map_err(|e| MathError::ConversionFailed {
            cleaned: cleaned.to_string(),
            reason: e.to_string(),
        })
}

/// Reject NaN and values beyond [`MAX_RESULT_VALUE`].
///
/// # Errors
///
/// `NotANumber` or `OutOfBounds`.
pub fn check_math_bounds(value: f64) -> Result<(), MathError> {
    if value.is_nan() {
        return Err(MathError::NotANumber);
    }
    if value.abs() > MAX_RESULT_VALUE {
        return Err(MathError::OutOfBounds {
            value,
            limit: MAX_RESULT_VALUE,
        });
    }
    Ok(())
}

/// Full validation gate: parse then bounds-check.
///
/// # Errors
///
/// Any [`MathError`] validation variant.
pub fn validate_math_result(raw: &str) -> Result<f64, MathError> {
    let value = parse_math_result(raw)?;
    check_math_bounds(value)?;
    Ok(value)
}

/// Solver bound to the math LLM client
#[derive(Debug, Clone)]
pub struct MathSolver {
    llm: LlmClient,
}

impl MathSolver {
    /// Create a solver
    #[must_use]
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Evaluate `query` and return the model's validated raw answer.
    ///
    /// # Errors
    ///
    /// Validation variants when the answer fails the gate,
    /// `MathError::Evaluation` when the LLM call fails.
    pub async fn solve(&self, query: &str) -> Result<String, MathError> {
        info!(query_preview = preview(query), "Starting math evaluation");

        let raw = self
            .llm
            .ask(&math_message(query), MATH_SYSTEM_PROMPT)
            .await
            .map_err(|e| {
                error!(query_preview = preview(query), error = %e, "Math evaluation failed");
                MathError::Evaluation(e.to_string())
            })?;

        if let Err(e) = validate_math_result(&raw) {
            error!(
                query_preview = preview(query),
                result = %preview(&raw),
                error = %e,
                "Math validation failed"
            );
            return Err(e);
        }

        info!(query_preview = preview(query), result = %raw, "Math evaluation completed");
        Ok(raw)
    }
}
