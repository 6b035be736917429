//! Integration tests for registration and login.

#![allow(clippy::unwrap_used)]

use shoprate_core::Role;
use shoprate_integration_tests::memory_pool;
use shoprate_portal::services::{IdentityError, IdentityService, Registration};

fn valid_registration<'a>(username: &'a str, email: &'a str) -> Registration<'a> {
    Registration {
        first_name: "Ada",
        last_name: "Lovelace",
        email,
        phone: "0100 000000",
        username,
        password: "password123",
        password_confirm: "password123",
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_and_authenticate() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    let user_id = identity
        .register(&valid_registration("ada", "ada@example.com"))
        .await
        .expect("registration should succeed");

    let principal = identity
        .authenticate("ada", "password123")
        .await
        .expect("login should succeed");

    assert_eq!(principal.id, user_id);
    assert_eq!(principal.role, Role::Customer);
    assert_eq!(principal.display_name, "Ada");
}

#[tokio::test]
async fn test_registration_collects_every_violation() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    let registration = Registration {
        first_name: "  ",
        last_name: "",
        email: "not-an-email",
        phone: "",
        username: "",
        password: "short",
        password_confirm: "different",
    };

    let err = identity.register(&registration).await.unwrap_err();
    let IdentityError::Validation(validation) = err else {
        panic!("expected validation error, got {err}");
    };

    assert_eq!(
        validation.reasons,
        vec![
            "First name is required".to_owned(),
            "Last name is required".to_owned(),
            "Valid email required".to_owned(),
            "Username is required".to_owned(),
            "Password must be at least 8 characters".to_owned(),
            "Passwords do not match".to_owned(),
        ]
    );
}

#[tokio::test]
async fn test_registration_rejects_duplicate_username() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    identity
        .register(&valid_registration("dave", "dave@example.com"))
        .await
        .expect("first registration should succeed");

    // Same username with surrounding whitespace still counts as taken
    let err = identity
        .register(&valid_registration("  dave  ", "dave2@example.com"))
        .await
        .unwrap_err();
    let IdentityError::Validation(validation) = err else {
        panic!("expected validation error, got {err}");
    };

    assert_eq!(validation.reasons, vec!["Username already taken".to_owned()]);
}

#[tokio::test]
async fn test_registration_failure_writes_nothing() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    let mut registration = valid_registration("eve", "eve@example.com");
    registration.password_confirm = "does-not-match";

    identity
        .register(&registration)
        .await
        .expect_err("mismatched passwords should fail");

    // The username stays free for a later, correct attempt
    identity
        .register(&valid_registration("eve", "eve@example.com"))
        .await
        .expect("username should still be available");
}

#[tokio::test]
async fn test_minimum_length_password_accepted() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    let registration = Registration {
        password: "12345678",
        password_confirm: "12345678",
        ..valid_registration("min", "min@example.com")
    };

    identity
        .register(&registration)
        .await
        .expect("an eight character password should pass");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_unknown_username_and_wrong_password_agree() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    identity
        .register(&valid_registration("ada", "ada@example.com"))
        .await
        .expect("registration should succeed");

    let unknown = identity.authenticate("nobody", "password123").await;
    let wrong = identity.authenticate("ada", "wrong-password").await;

    assert!(matches!(unknown, Err(IdentityError::InvalidCredentials)));
    assert!(matches!(wrong, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_trims_username() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    identity
        .register(&valid_registration("ada", "ada@example.com"))
        .await
        .expect("registration should succeed");

    identity
        .authenticate("  ada  ", "password123")
        .await
        .expect("trimmed username should match");
}

// ============================================================================
// Admin Provisioning
// ============================================================================

#[tokio::test]
async fn test_create_admin_gets_admin_role() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    identity
        .create_admin(&valid_registration("boss", "boss@example.com"))
        .await
        .expect("admin creation should succeed");

    let principal = identity
        .authenticate("boss", "password123")
        .await
        .expect("admin login should succeed");

    assert_eq!(principal.role, Role::Admin);
}

#[tokio::test]
async fn test_create_admin_applies_same_validation() {
    let pool = memory_pool().await;
    let identity = IdentityService::new(&pool);

    let registration = Registration {
        password: "short",
        password_confirm: "short",
        ..valid_registration("boss", "boss@example.com")
    };

    let err = identity.create_admin(&registration).await.unwrap_err();
    assert!(matches!(err, IdentityError::Validation(_)));
}
