use std::sync::OnceLock;

use regex::Regex;

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok()).as_ref()
}

fn username_regex() -> Option<&'static Regex> {
    static USERNAME: OnceLock<Option<Regex>> = OnceLock::new();
    USERNAME.get_or_init(|| Regex::new(r"^[A-Za-z0-9\-._@]+$").ok()).as_ref()
}

/// Usernames may only contain ASCII letters, digits and `-._@`.
pub fn is_valid_username(username: &str) -> bool {
    username_regex().map(|re| re.is_match(username)).unwrap_or(false)
}

/// Shape check only: `local@domain.tld`, with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().map(|re| re.is_match(email)).unwrap_or(false)
}
