//! Contact details captured by lead and booking forms.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::FieldViolation;

/// Minimum characters in a person's name.
pub const NAME_MIN: usize = 2;
/// Maximum characters in a person's name.
pub const NAME_MAX: usize = 100;
/// Maximum length of an email address (RFC 5321 path limit).
pub const EMAIL_MAX: usize = 254;
/// Minimum digits in a phone number.
pub const PHONE_DIGITS_MIN: usize = 10;
/// Maximum digits in a phone number (E.164).
pub const PHONE_DIGITS_MAX: usize = 15;
/// Minimum characters in a city name.
pub const CITY_MIN: usize = 2;
/// Maximum characters in a city name.
pub const CITY_MAX: usize = 80;

/// Validation errors for contact details.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// Name was blank.
    #[error("name must not be empty")]
    EmptyName,
    /// Name length outside bounds.
    #[error("name must be between {NAME_MIN} and {NAME_MAX} characters")]
    NameLength,
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email malformed or too long.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Phone was blank.
    #[error("phone must not be empty")]
    EmptyPhone,
    /// Phone contains characters other than digits and separators.
    #[error("phone may only contain digits, spaces, dashes, brackets and a leading +")]
    InvalidPhoneCharacters,
    /// Phone digit count outside bounds.
    #[error("phone must contain between {PHONE_DIGITS_MIN} and {PHONE_DIGITS_MAX} digits")]
    PhoneLength,
    /// City was blank.
    #[error("city must not be empty")]
    EmptyCity,
    /// City length outside bounds.
    #[error("city must be between {CITY_MIN} and {CITY_MAX} characters")]
    CityLength,
}

impl FieldViolation for ContactValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyEmail | Self::EmptyPhone | Self::EmptyCity => "required",
            Self::NameLength | Self::PhoneLength | Self::CityLength => "invalid_length",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPhoneCharacters => "invalid_phone",
        }
    }
}

macro_rules! string_newtype {
    ($name:ident) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ContactValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

/// A person's full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a name; surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, ContactValidationError> {
        let trimmed = raw.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        let length = trimmed.chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&length) {
            return Err(ContactValidationError::NameLength);
        }
        Ok(Self(trimmed))
    }
}

string_newtype!(PersonName);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Pragmatic shape check; deliverability is the mail provider's job.
        let pattern = r"^[a-z0-9._%+\-]+@[a-z0-9\-]+(\.[a-z0-9\-]+)*\.[a-z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// A normalised (trimmed, lower-cased) email address.
///
/// # Examples
/// ```
/// use site_backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Rider@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "rider@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl Into<String>) -> Result<Self, ContactValidationError> {
        let normalised = raw.into().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(ContactValidationError::EmptyEmail);
        }
        if normalised.len() > EMAIL_MAX || !email_regex().is_match(&normalised) {
            return Err(ContactValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

string_newtype!(EmailAddress);

/// A phone number stored as digits with an optional leading `+`.
///
/// # Examples
/// ```
/// use site_backend::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("+91 (98765) 43-210").unwrap();
/// assert_eq!(phone.as_ref(), "+919876543210");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and normalise a phone number.
    pub fn new(raw: impl Into<String>) -> Result<Self, ContactValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ContactValidationError::EmptyPhone);
        }
        let (plus, rest) = match trimmed.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if !rest
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, ' ' | '-' | '(' | ')'))
        {
            return Err(ContactValidationError::InvalidPhoneCharacters);
        }
        let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
        if !(PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&digits.len()) {
            return Err(ContactValidationError::PhoneLength);
        }
        Ok(Self(if plus { format!("+{digits}") } else { digits }))
    }
}

string_newtype!(PhoneNumber);

/// City the enquiry relates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct City(String);

impl City {
    /// Validate and construct a city name.
    pub fn new(raw: impl Into<String>) -> Result<Self, ContactValidationError> {
        let trimmed = raw.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(ContactValidationError::EmptyCity);
        }
        let length = trimmed.chars().count();
        if !(CITY_MIN..=CITY_MAX).contains(&length) {
            return Err(ContactValidationError::CityLength);
        }
        Ok(Self(trimmed))
    }
}

string_newtype!(City);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Asha Rao")]
    #[case("  Li  ")]
    fn accepts_names(#[case] raw: &str) {
        assert!(PersonName::new(raw).is_ok());
    }

    #[rstest]
    #[case("", ContactValidationError::EmptyName)]
    #[case("A", ContactValidationError::NameLength)]
    fn rejects_names(#[case] raw: &str, #[case] expected: ContactValidationError) {
        assert_eq!(PersonName::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_names() {
        assert_eq!(
            PersonName::new("x".repeat(NAME_MAX + 1)),
            Err(ContactValidationError::NameLength)
        );
    }

    #[rstest]
    #[case("rider@example.com")]
    #[case("first.last+ev@mail.example.co.in")]
    fn accepts_emails(#[case] raw: &str) {
        assert!(EmailAddress::new(raw).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("rider")]
    #[case("rider@")]
    #[case("rider@example")]
    #[case("two@@example.com")]
    #[case("spaces in@example.com")]
    fn rejects_emails(#[case] raw: &str) {
        assert!(EmailAddress::new(raw).is_err());
    }

    #[rstest]
    #[case("9876543210", "9876543210")]
    #[case("+1 415-555-0100", "+14155550100")]
    #[case("(022) 2345 6789", "02223456789")]
    fn normalises_phones(#[case] raw: &str, #[case] expected: &str) {
        let phone = PhoneNumber::new(raw).expect("valid phone");
        assert_eq!(phone.as_ref(), expected);
    }

    #[rstest]
    #[case("", ContactValidationError::EmptyPhone)]
    #[case("12345", ContactValidationError::PhoneLength)]
    #[case("1234567890123456", ContactValidationError::PhoneLength)]
    #[case("98765x43210", ContactValidationError::InvalidPhoneCharacters)]
    #[case("98765+43210", ContactValidationError::InvalidPhoneCharacters)]
    fn rejects_phones(#[case] raw: &str, #[case] expected: ContactValidationError) {
        assert_eq!(PhoneNumber::new(raw), Err(expected));
    }

    #[rstest]
    fn violation_codes_are_stable() {
        assert_eq!(ContactValidationError::InvalidEmail.code(), "invalid_email");
        assert_eq!(ContactValidationError::EmptyCity.code(), "required");
        assert_eq!(ContactValidationError::PhoneLength.code(), "invalid_length");
    }

    #[rstest]
    fn deserialisation_validates() {
        let parsed: Result<EmailAddress, _> = serde_json::from_str("\"nope\"");
        assert!(parsed.is_err());
    }
}
