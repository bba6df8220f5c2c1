use std::sync::OnceLock;

use regex::Regex;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").unwrap_or_else(|err| panic!("bad email regex: {err}"))
    })
}

/// Returns true for `local@domain.tld`-shaped strings.
///
/// The domain must contain at least one dot followed by word characters.
/// This is a gate for audit logging, not an RFC 5322 parser.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}
