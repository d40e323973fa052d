use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// `local@domain.tld` with no whitespace in any part.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Minimum age, in whole years, to register as a participant.
pub const MIN_PARTICIPANT_AGE: i32 = 18;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Password length in characters, not bytes.
pub fn is_long_enough_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Completed years between `birth` and `today`. Negative for future dates.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// True when the value is absent or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
