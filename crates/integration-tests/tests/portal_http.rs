//! End-to-end HTTP tests for the portal.
//!
//! Each test serves the full router (sessions included) on an ephemeral
//! port and drives it with a cookie-carrying HTTP client, the way a
//! browser would.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode, redirect};

use shoprate_integration_tests::{
    admin, customer, customer_named, memory_pool, shop, spawn_portal, submit_review,
};

/// Create an HTTP client with a cookie store, following redirects.
fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Create an HTTP client that reports redirects instead of following them.
fn no_redirect_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

async fn login(client: &Client, base_url: &str, username: &str) -> reqwest::Response {
    client
        .post(format!("{base_url}/auth/login"))
        .form(&[("username", username), ("password", "password123")])
        .send()
        .await
        .expect("login request should send")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let pool = memory_pool().await;
    let base_url = spawn_portal(pool).await;
    let client = browser();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("health request should send");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body should read"), "ok");

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("readiness request should send");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Registration and Login Flow
// ============================================================================

#[tokio::test]
async fn test_register_login_and_submit_review_flow() {
    let pool = memory_pool().await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    let base_url = spawn_portal(pool).await;
    let client = browser();

    // Register; the portal redirects to the login page with a notice
    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("first_name", "Ada"),
            ("last_name", "Lovelace"),
            ("email", "ada@example.com"),
            ("phone", "0100 000000"),
            ("username", "ada"),
            ("password", "password123"),
            ("password_confirm", "password123"),
        ])
        .send()
        .await
        .expect("register request should send");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body should read");
    assert!(body.contains("Registration successful. Please log in."));

    // Log in; customers land on the home page with a greeting
    let resp = login(&client, &base_url, "ada").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body should read");
    assert!(body.contains("Hello, Ada"));

    // The review form is now reachable
    let resp = client
        .get(format!("{base_url}/reviews/new"))
        .send()
        .await
        .expect("review form request should send");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .text()
        .await
        .expect("body should read")
        .contains("Write a Review"));

    // Submit a review; the portal redirects to the history page
    let resp = client
        .post(format!("{base_url}/reviews"))
        .form(&[
            ("shop_id", shop_id.to_string().as_str()),
            ("rating", "4"),
            ("body", "Friendly staff"),
            ("review_date", "2026-08-01"),
        ])
        .send()
        .await
        .expect("review submission should send");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body should read");
    assert!(body.contains("Review recorded. Thank you!"));
    assert!(body.contains("Corner Shop"));
    assert!(body.contains("Friendly staff"));
}

#[tokio::test]
async fn test_register_rerenders_with_all_reasons() {
    let pool = memory_pool().await;
    let base_url = spawn_portal(pool).await;
    let client = browser();

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("first_name", ""),
            ("last_name", ""),
            ("email", "not-an-email"),
            ("phone", ""),
            ("username", "ada"),
            ("password", "short"),
            ("password_confirm", "other"),
        ])
        .send()
        .await
        .expect("register request should send");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.text().await.expect("body should read");
    assert!(body.contains("First name is required"));
    assert!(body.contains("Last name is required"));
    assert!(body.contains("Valid email required"));
    assert!(body.contains("Password must be at least 8 characters"));
    assert!(body.contains("Passwords do not match"));
    // The username is echoed back, the passwords never are
    assert!(body.contains(r#"value="ada""#));
    assert!(!body.contains("short"));
}

#[tokio::test]
async fn test_login_failure_is_unauthorized_and_uniform() {
    let pool = memory_pool().await;
    customer(&pool, "ada").await;
    let base_url = spawn_portal(pool).await;
    let client = browser();

    let unknown = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("username", "nobody"), ("password", "password123")])
        .send()
        .await
        .expect("login request should send");
    let wrong = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("username", "ada"), ("password", "wrong-password")])
        .send()
        .await
        .expect("login request should send");

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = unknown.text().await.expect("body should read");
    let wrong_body = wrong.text().await.expect("body should read");
    assert!(unknown_body.contains("Invalid credentials"));
    assert!(wrong_body.contains("Invalid credentials"));
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let pool = memory_pool().await;
    customer_named(&pool, "ada", "Ada", "Lovelace").await;
    let base_url = spawn_portal(pool).await;
    let client = browser();

    let resp = login(&client, &base_url, "ada").await;
    assert!(resp
        .text()
        .await
        .expect("body should read")
        .contains("Hello, Ada"));

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("logout request should send");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body should read");
    assert!(!body.contains("Hello, Ada"));

    // The same client, stale cookie and all, bounces back to login
    let resp = client
        .get(format!("{base_url}/reviews/mine"))
        .send()
        .await
        .expect("history request should send");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .text()
        .await
        .expect("body should read")
        .contains(r#"action="/auth/login""#));
}

// ============================================================================
// Access Control over HTTP
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_history_redirects_to_login() {
    let pool = memory_pool().await;
    let base_url = spawn_portal(pool).await;
    let client = no_redirect_client();

    let resp = client
        .get(format!("{base_url}/reviews/mine"))
        .send()
        .await
        .expect("history request should send");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect should carry a location");
    assert_eq!(location, "/auth/login");
}

#[tokio::test]
async fn test_customer_gets_forbidden_from_admin_area() {
    let pool = memory_pool().await;
    customer(&pool, "ada").await;
    let base_url = spawn_portal(pool).await;
    let client = browser();

    login(&client, &base_url, "ada").await;

    let resp = client
        .get(format!("{base_url}/admin"))
        .send()
        .await
        .expect("admin request should send");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_gets_forbidden_from_review_form() {
    let pool = memory_pool().await;
    admin(&pool, "boss").await;
    let base_url = spawn_portal(pool).await;
    let client = browser();

    login(&client, &base_url, "boss").await;

    let resp = client
        .get(format!("{base_url}/reviews/new"))
        .send()
        .await
        .expect("review form request should send");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_home_shows_rounded_averages() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;
    let rated = shop(&pool, "Rated Shop", "Leeds").await;
    shop(&pool, "Quiet Shop", "York").await;
    submit_review(&pool, &ada, rated, 2, "2026-08-01").await;
    submit_review(&pool, &ada, rated, 4, "2026-08-02").await;
    submit_review(&pool, &ada, rated, 5, "2026-08-03").await;

    let base_url = spawn_portal(pool).await;
    let resp = browser()
        .get(&base_url)
        .send()
        .await
        .expect("home request should send");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("body should read");
    // 11 / 3 rendered to two decimal places
    assert!(body.contains("3.67"));
    // A shop with no reviews renders a dash, not 0.00
    assert!(body.contains("&mdash;"));
    assert!(!body.contains("0.00"));
}

#[tokio::test]
async fn test_admin_dashboard_lists_one_star_contacts() {
    let pool = memory_pool().await;
    admin(&pool, "boss").await;
    let ada = customer(&pool, "ada").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    submit_review(&pool, &ada, shop_id, 1, "2026-08-01").await;

    let base_url = spawn_portal(pool).await;
    let client = browser();

    // Admin logins land straight on the dashboard
    let resp = login(&client, &base_url, "boss").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("body should read");
    assert!(body.contains("Admin Dashboard"));
    assert!(body.contains("Customers who gave 1-star"));
    assert!(body.contains("ada@example.com"));
}

#[tokio::test]
async fn test_review_validation_rerenders_the_form() {
    let pool = memory_pool().await;
    customer(&pool, "ada").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    let base_url = spawn_portal(pool).await;
    let client = browser();

    login(&client, &base_url, "ada").await;

    let resp = client
        .post(format!("{base_url}/reviews"))
        .form(&[
            ("shop_id", shop_id.to_string().as_str()),
            ("rating", "7"),
            ("body", "way too enthusiastic"),
            ("review_date", "2026-08-01"),
        ])
        .send()
        .await
        .expect("review submission should send");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.text().await.expect("body should read");
    assert!(body.contains("Rating must be 1-5"));
    // The body text is echoed back for correction
    assert!(body.contains("way too enthusiastic"));
}

#[tokio::test]
async fn test_unknown_path_renders_not_found() {
    let pool = memory_pool().await;
    let base_url = spawn_portal(pool).await;

    let resp = browser()
        .get(format!("{base_url}/no-such-page"))
        .send()
        .await
        .expect("request should send");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp
        .text()
        .await
        .expect("body should read")
        .contains("Page not found."));
}
