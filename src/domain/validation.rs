//! Field validation
//!
//! Checks applied to request bodies before they reach the core.

use super::ValidationError;

pub const MAX_NAME_LEN: usize = 100;
pub const MIN_PASSWORD_LEN: usize = 6;
/// bcrypt only looks at the first 72 bytes
pub const MAX_PASSWORD_LEN: usize = 72;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Lowercase and trim an email so lookups and the unique index agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize and sanity-check an email address.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = normalize_email(email);
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ValidationError::InvalidEmail),
    };

    if local.is_empty()
        || domain.is_empty()
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(email)
}

/// Trim a display / category name and enforce 1..=100 characters.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidName("must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::InvalidName(format!(
            "must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_LEN {
        return Err(ValidationError::InvalidPassword(format!(
            "must be between {} and {} bytes",
            MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Blank descriptions are stored as NULL.
pub fn validate_description(
    description: Option<String>,
) -> Result<Option<String>, ValidationError> {
    match description.map(|d| d.trim().to_string()) {
        Some(d) if d.is_empty() => Ok(None),
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(
            ValidationError::InvalidDescription(format!(
                "must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )),
        ),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("Bob@Mail.org").unwrap(), "bob@mail.org");
        for bad in ["bob", "@mail.org", "bob@", "a@b@c", "bob@.org", "b ob@mail.org"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Groceries ").unwrap(), "Groceries");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
        assert!(validate_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password(&"p".repeat(72)).is_ok());
        assert!(validate_password(&"p".repeat(73)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert_eq!(validate_description(None).unwrap(), None);
        assert_eq!(validate_description(Some("  ".into())).unwrap(), None);
        assert_eq!(
            validate_description(Some(" lunch ".into())).unwrap(),
            Some("lunch".to_string())
        );
        assert!(validate_description(Some("d".repeat(501))).is_err());
    }
}
