use crate::error::{AppError, Result};
use crate::graphql::types::{LoginInput, SignUpInput};

/// Rejects a missing or blank required field. The message matches for every
/// field, so nothing leaks about which one was empty.
fn require(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    Ok(())
}

/// Validates a `signUp` input: every field must be present. The gender field
/// is enforced by the schema's enum type.
pub fn validate_sign_up(input: &SignUpInput) -> Result<()> {
    require(&input.username)?;
    require(&input.name)?;
    require(&input.password)?;
    Ok(())
}

/// Validates a `login` input: both fields must be present.
pub fn validate_login(input: &LoginInput) -> Result<()> {
    require(&input.username)?;
    require(&input.password)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Gender;

    #[test]
    fn blank_fields_are_rejected() {
        let input = SignUpInput {
            username: "alice".to_string(),
            name: "  ".to_string(),
            password: "secret123".to_string(),
            gender: Gender::Female,
        };
        let err = validate_sign_up(&input).unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[test]
    fn complete_inputs_pass() {
        let input = SignUpInput {
            username: "alice".to_string(),
            name: "Alice".to_string(),
            password: "secret123".to_string(),
            gender: Gender::Female,
        };
        assert!(validate_sign_up(&input).is_ok());

        let login = LoginInput {
            username: "alice".to_string(),
            password: "secret123".to_string(),
        };
        assert!(validate_login(&login).is_ok());
    }

    #[test]
    fn login_requires_both_fields() {
        let login = LoginInput {
            username: "alice".to_string(),
            password: String::new(),
        };
        assert!(validate_login(&login).is_err());
    }
}
