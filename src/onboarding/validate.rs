//! Field validators for the onboarding forms.
//!
//! The shape checks are plain predicates. The `check_*` functions run them in
//! a fixed order and report only the first failure.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Shortest accepted password, in characters.
pub const PASSWORD_MIN_CHARS: usize = 4;
/// Longest accepted password, in characters.
pub const PASSWORD_MAX_CHARS: usize = 8;

/// Letter-only words separated by a single space, hyphen, or apostrophe.
static NAME_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+([ '-][a-zA-Z]+)*$").unwrap());

/// One `@`, no whitespace, and a dot somewhere in the domain.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_name(name: &str) -> bool {
    NAME_SHAPE.is_match(name)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

pub fn is_valid_password_length(password: &str) -> bool {
    (PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&password.chars().count())
}

/// Order: required fields, name, email, password length, terms.
pub fn check_sign_up(
    full_name: &str,
    email: &str,
    password: &str,
    agree_to_terms: bool,
) -> Result<(), ValidationError> {
    if full_name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_name(full_name) {
        return Err(ValidationError::InvalidName);
    }
    check_credentials(email, password)?;
    if !agree_to_terms {
        return Err(ValidationError::TermsNotAccepted);
    }
    Ok(())
}

/// Order: required fields, email, password length.
pub fn check_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    check_credentials(email, password)
}

fn check_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_password_length(password) {
        return Err(ValidationError::PasswordLength);
    }
    Ok(())
}

/// A suggestion needs at least a few non-blank words to work from.
pub fn check_bio_prompt(bio_text: &str) -> Result<(), ValidationError> {
    if bio_text.trim().is_empty() {
        return Err(ValidationError::EmptyBioPrompt);
    }
    Ok(())
}

/// Finishing needs either a typed bio or a generated suggestion.
pub fn check_bio_finish(bio_text: &str, suggestion: Option<&str>) -> Result<(), ValidationError> {
    let has_suggestion = suggestion.is_some_and(|s| !s.trim().is_empty());
    if bio_text.trim().is_empty() && !has_suggestion {
        return Err(ValidationError::EmptyBio);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_shape_accepts_common_names() {
        for name in ["Anna Maria", "O'Brien", "Jean-Luc", "Jane Doe", "X"] {
            assert!(is_valid_name(name), "{name:?} should be accepted");
        }
    }

    #[test]
    fn name_shape_rejects_malformed() {
        for name in ["", "Anna3", "  ", "Anna  Maria", " Anna", "Anna ", "-Luc", "Jean--Luc"] {
            assert!(!is_valid_name(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("jane@x.com"));
        for email in ["a@b", "a b@c.com", "@b.com", "a@@b.com", "a@b.", "", "a@b.com "] {
            assert!(!is_valid_email(email), "{email:?} should be rejected");
        }
    }

    #[test]
    fn password_length_bounds() {
        assert!(!is_valid_password_length("abc"));
        assert!(is_valid_password_length("abcd"));
        assert!(is_valid_password_length("abcdefgh"));
        assert!(!is_valid_password_length("abcdefghi"));
    }

    #[test]
    fn password_length_counts_characters() {
        // four characters, more than four bytes
        assert!(is_valid_password_length("ñüéß"));
        assert!(!is_valid_password_length("ñüé"));
    }

    #[test]
    fn sign_up_first_failure_wins() {
        assert_eq!(check_sign_up("", "bad", "x", false), Err(ValidationError::MissingFields));
        assert_eq!(check_sign_up("Jane3", "bad", "x", false), Err(ValidationError::InvalidName));
        assert_eq!(check_sign_up("Jane", "bad", "x", false), Err(ValidationError::InvalidEmail));
        assert_eq!(check_sign_up("Jane", "j@x.com", "x", false), Err(ValidationError::PasswordLength));
        assert_eq!(
            check_sign_up("Jane", "j@x.com", "pass1", false),
            Err(ValidationError::TermsNotAccepted)
        );
        assert_eq!(check_sign_up("Jane", "j@x.com", "pass1", true), Ok(()));
    }

    #[test]
    fn login_ignores_name_and_terms() {
        assert_eq!(check_login("", "pass"), Err(ValidationError::MissingFields));
        assert_eq!(check_login("j@x.com", ""), Err(ValidationError::MissingFields));
        assert_eq!(check_login("nope", "pass"), Err(ValidationError::InvalidEmail));
        assert_eq!(check_login("j@x.com", "toolongpass"), Err(ValidationError::PasswordLength));
        assert_eq!(check_login("j@x.com", "pass"), Ok(()));
    }

    #[test]
    fn bio_checks() {
        assert_eq!(check_bio_prompt("   "), Err(ValidationError::EmptyBioPrompt));
        assert_eq!(check_bio_prompt("hiking"), Ok(()));

        assert_eq!(check_bio_finish("", None), Err(ValidationError::EmptyBio));
        assert_eq!(check_bio_finish(" ", Some("  ")), Err(ValidationError::EmptyBio));
        assert_eq!(check_bio_finish("hiking", None), Ok(()));
        assert_eq!(check_bio_finish("", Some("A bio")), Ok(()));
    }
}
