//! Shape checks for user input.
//!
//! Each validator collects every violated rule instead of stopping at the
//! first one, so callers can report all of them at once.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const CONTENT_MIN_LEN: usize = 10;
pub const CONTENT_MAX_LEN: usize = 300;
pub const PASSWORD_MIN_LEN: usize = 6;

static USERNAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static VERIFY_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameRule {
    TooShort,
    TooLong,
    InvalidCharacters,
}

impl fmt::Display for UsernameRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UsernameRule::TooShort => {
                write!(f, "Username must be at least {USERNAME_MIN_LEN} characters")
            }
            UsernameRule::TooLong => {
                write!(f, "Username must be no more than {USERNAME_MAX_LEN} characters")
            }
            UsernameRule::InvalidCharacters => {
                write!(f, "Username must not contain special characters")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    /// The parameter was absent or not a string.
    #[error("Invalid query parameters")]
    Missing,

    #[error("{}", join(.0))]
    Invalid(Vec<UsernameRule>),
}

/// A username that passed every shape rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let violations = username_violations(raw);
        if violations.is_empty() {
            Ok(Self(raw.to_owned()))
        } else {
            Err(UsernameError::Invalid(violations))
        }
    }

    /// Like [`Username::parse`], for a query parameter that may be missing.
    pub fn from_query(raw: Option<&str>) -> Result<Self, UsernameError> {
        Self::parse(raw.ok_or(UsernameError::Missing)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn username_violations(raw: &str) -> Vec<UsernameRule> {
    let len = raw.chars().count();
    let mut violations = Vec::new();
    if len < USERNAME_MIN_LEN {
        violations.push(UsernameRule::TooShort);
    }
    if len > USERNAME_MAX_LEN {
        violations.push(UsernameRule::TooLong);
    }
    if !USERNAME_CHARS.is_match(raw) {
        violations.push(UsernameRule::InvalidCharacters);
    }
    violations
}

/// Every violated rule of a compound input, already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join(.0))]
pub struct Violations(pub Vec<String>);

impl Violations {
    fn check(self) -> Result<(), Violations> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

pub fn message_content(content: &str) -> Result<(), Violations> {
    let len = content.chars().count();
    let mut violations = Vec::new();
    if len < CONTENT_MIN_LEN {
        violations.push(format!("Content must be at least {CONTENT_MIN_LEN} characters"));
    }
    if len > CONTENT_MAX_LEN {
        violations.push(format!("Content must not be longer than {CONTENT_MAX_LEN} characters"));
    }
    Violations(violations).check()
}

/// Validated sign-up input.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub username: Username,
    pub email: String,
    pub password: String,
}

pub fn sign_up(username: &str, email: &str, password: &str) -> Result<SignUp, Violations> {
    let mut violations: Vec<String> =
        username_violations(username).iter().map(ToString::to_string).collect();
    if !EMAIL_SHAPE.is_match(email) {
        violations.push("Invalid email address".to_owned());
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        violations.push(format!("Password must be at least {PASSWORD_MIN_LEN} characters"));
    }
    Violations(violations).check()?;

    Ok(SignUp {
        username: Username(username.to_owned()),
        email: email.to_owned(),
        password: password.to_owned(),
    })
}

pub fn verify_code(code: &str) -> Result<(), Violations> {
    if VERIFY_CODE.is_match(code) {
        Ok(())
    } else {
        Err(Violations(vec!["Verification code must be 6 digits".to_owned()]))
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
