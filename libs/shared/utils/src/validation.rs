use std::sync::OnceLock;

use regex::Regex;

/// Longest address a mail server must accept.
pub const MAX_EMAIL_LEN: usize = 254;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
    })
}

/// Shape check used for every email the API accepts: users, bookings, doctors.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && email_pattern().is_match(email)
}
