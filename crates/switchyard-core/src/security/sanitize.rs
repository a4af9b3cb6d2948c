//! HTML clean-up for incoming chat messages.
//!
//! Tags outside a small formatting allow-list are stripped and their inner
//! text kept. `script` and `style` bodies are dropped entirely. On allowed
//! tags only `class` survives, and only on `span` and `p`.

use regex::{Captures, Regex};
use std::sync::OnceLock;

const ALLOWED_TAGS: &[&str] = &["b", "i", "u", "em", "strong", "p", "br", "span"];
const CLASS_TAGS: &[&str] = &["span", "p"];

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<!--.*?-->")
            .unwrap()
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").unwrap())
}

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#).unwrap()
    })
}

fn rebuild_tag(caps: &Captures<'_>) -> String {
    let closing = !caps[1].is_empty();
    let name = caps[2].to_lowercase();

    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return String::new();
    }
    if closing {
        return format!("</{name}>");
    }

    let class = if CLASS_TAGS.contains(&name.as_str()) {
        class_re().captures(&caps[3]).and_then(|c| {
            c.get(1)
                .or_else(|| c.get(2))
                .or_else(|| c.get(3))
                .map(|m| m.as_str().replace('"', "&quot;"))
        })
    } else {
        None
    };

    match class {
        Some(value) => format!("<{name} class=\"{value}\">"),
        None => format!("<{name}>"),
    }
}

/// Strip disallowed markup from a chat message.
#[must_use]
pub fn sanitize_user_input(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_blocks = block_re().replace_all(text, "");
    tag_re()
        .replace_all(&without_blocks, |caps: &Captures<'_>| rebuild_tag(caps))
        .into_owned()
}
