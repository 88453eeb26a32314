//! Environment variable substitution for action statements
//!
//! Replaces `$NAME` and `${NAME}` occurrences with the current value of the
//! process environment variable, or the empty string when it is unset. The
//! substitution runs exactly once, before shell-word tokenization.

use regex::Regex;
use std::env;

/// Expand `$NAME` / `${NAME}` references against the process environment
pub fn expand_env(input: &str) -> String {
    let re = Regex::new(r"\$(?:\{([^}]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap();

    re.replace_all(input, |caps: &regex::Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        env::var(name).unwrap_or_default()
    })
    .to_string()
}
