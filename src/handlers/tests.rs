//! Handler tests that need no database

use crate::domain::ValidationError;
use crate::handlers::{AuthResult, LoginCommand, RegisterCommand};

#[test]
fn test_register_command_normalizes() {
    let cmd = RegisterCommand::new("  Alice ", " Alice@Example.COM ", "secret1")
        .validate()
        .unwrap();

    assert_eq!(cmd.name, "Alice");
    assert_eq!(cmd.email, "alice@example.com");
    assert_eq!(cmd.password, "secret1");
}

#[test]
fn test_register_command_rejects_bad_input() {
    assert_eq!(
        RegisterCommand::new("Bob", "bob.example.com", "secret1")
            .validate()
            .unwrap_err(),
        ValidationError::InvalidEmail
    );
    assert!(matches!(
        RegisterCommand::new("   ", "bob@example.com", "secret1").validate(),
        Err(ValidationError::InvalidName(_))
    ));
    assert!(matches!(
        RegisterCommand::new("Bob", "bob@example.com", "short").validate(),
        Err(ValidationError::InvalidPassword(_))
    ));
    assert!(matches!(
        RegisterCommand::new("Bob", "bob@example.com", "x".repeat(73)).validate(),
        Err(ValidationError::InvalidPassword(_))
    ));
}

#[test]
fn test_password_is_not_trimmed() {
    let cmd = RegisterCommand::new("Bob", "bob@example.com", " pass word ")
        .validate()
        .unwrap();
    assert_eq!(cmd.password, " pass word ");
}

#[test]
fn test_login_command_deserialize() {
    let cmd: LoginCommand =
        serde_json::from_str(r#"{"email":"a@b.c","password":"secret1"}"#).unwrap();
    assert_eq!(cmd.email, "a@b.c");
    assert_eq!(cmd.password, "secret1");

    assert!(serde_json::from_str::<LoginCommand>(r#"{"email":"a@b.c"}"#).is_err());
}

#[test]
fn test_auth_result_serializes_id() {
    let result = AuthResult {
        user_id: 7,
        token: "abc".to_string(),
    };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json, serde_json::json!({"id": 7, "token": "abc"}));
}
