//! Integration tests for review submission, history, and aggregates.

#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, Utc};

use shoprate_core::AccessError;
use shoprate_integration_tests::{
    admin, customer, customer_named, memory_pool, shop, submit_review,
};
use shoprate_portal::services::{ReviewError, ReviewService, ReviewSubmission};

fn date(s: &str) -> NaiveDate {
    s.parse().expect("test date should parse")
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_review_binds_to_authenticated_principal() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;
    let bob = customer(&pool, "bob").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;

    let service = ReviewService::new(&pool);
    let submission = ReviewSubmission {
        shop_id: shop_id.as_i64(),
        rating: 4,
        body: Some("Friendly staff"),
        review_date: Some("2026-08-01"),
    };
    service
        .submit(Some(&ada), &submission)
        .await
        .expect("submission should succeed");

    let ada_reviews = service
        .list_for_user(Some(&ada))
        .await
        .expect("history should load");
    assert_eq!(ada_reviews.len(), 1);
    assert_eq!(ada_reviews[0].review.user_id, ada.id);
    assert_eq!(ada_reviews[0].review.rating.as_u8(), 4);
    assert_eq!(ada_reviews[0].shop_name, "Corner Shop");

    let bob_reviews = service
        .list_for_user(Some(&bob))
        .await
        .expect("history should load");
    assert!(bob_reviews.is_empty());
}

#[tokio::test]
async fn test_submission_collects_every_reason() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;

    let service = ReviewService::new(&pool);
    let submission = ReviewSubmission {
        shop_id: 9999,
        rating: 0,
        body: None,
        review_date: Some("not-a-date"),
    };

    let err = service.submit(Some(&ada), &submission).await.unwrap_err();
    let ReviewError::Validation(validation) = err else {
        panic!("expected validation error, got {err}");
    };

    assert_eq!(
        validation.reasons,
        vec![
            "Please choose a valid shop".to_owned(),
            "Rating must be 1-5".to_owned(),
            "Review date must be a valid date".to_owned(),
        ]
    );
}

#[tokio::test]
async fn test_rating_bounds() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    let service = ReviewService::new(&pool);

    for rating in [0, 6, -1] {
        let submission = ReviewSubmission {
            shop_id: shop_id.as_i64(),
            rating,
            body: None,
            review_date: Some("2026-08-01"),
        };
        let err = service.submit(Some(&ada), &submission).await.unwrap_err();
        assert!(
            matches!(err, ReviewError::Validation(_)),
            "rating {rating} should be rejected"
        );
    }

    for rating in [1, 5] {
        let submission = ReviewSubmission {
            shop_id: shop_id.as_i64(),
            rating,
            body: None,
            review_date: Some("2026-08-01"),
        };
        service
            .submit(Some(&ada), &submission)
            .await
            .expect("boundary ratings should be accepted");
    }
}

#[tokio::test]
async fn test_blank_date_defaults_to_today() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    let service = ReviewService::new(&pool);

    for review_date in [None, Some(""), Some("   ")] {
        let submission = ReviewSubmission {
            shop_id: shop_id.as_i64(),
            rating: 5,
            body: None,
            review_date,
        };
        service
            .submit(Some(&ada), &submission)
            .await
            .expect("blank date should default, not fail");
    }

    let today = Utc::now().date_naive();
    let reviews = service
        .list_for_user(Some(&ada))
        .await
        .expect("history should load");
    assert_eq!(reviews.len(), 3);
    for r in &reviews {
        assert_eq!(r.review.review_date, today);
    }
}

#[tokio::test]
async fn test_body_is_trimmed_and_blank_becomes_none() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    let service = ReviewService::new(&pool);

    let blank = ReviewSubmission {
        shop_id: shop_id.as_i64(),
        rating: 3,
        body: Some("   "),
        review_date: Some("2026-08-01"),
    };
    let padded = ReviewSubmission {
        shop_id: shop_id.as_i64(),
        rating: 3,
        body: Some("  lovely bread  "),
        review_date: Some("2026-08-02"),
    };
    service
        .submit(Some(&ada), &blank)
        .await
        .expect("blank body should be accepted");
    service
        .submit(Some(&ada), &padded)
        .await
        .expect("padded body should be accepted");

    let reviews = service
        .list_for_user(Some(&ada))
        .await
        .expect("history should load");
    // Newest first: the padded one is dated later
    assert_eq!(reviews[0].review.body.as_deref(), Some("lovely bread"));
    assert_eq!(reviews[1].review.body, None);
}

// ============================================================================
// History and Shop Listings
// ============================================================================

#[tokio::test]
async fn test_history_is_newest_first() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;

    submit_review(&pool, &ada, shop_id, 3, "2026-01-01").await;
    submit_review(&pool, &ada, shop_id, 4, "2026-03-01").await;
    submit_review(&pool, &ada, shop_id, 5, "2026-02-01").await;

    let reviews = ReviewService::new(&pool)
        .list_for_user(Some(&ada))
        .await
        .expect("history should load");
    let dates: Vec<NaiveDate> = reviews.iter().map(|r| r.review.review_date).collect();

    assert_eq!(
        dates,
        vec![date("2026-03-01"), date("2026-02-01"), date("2026-01-01")]
    );
}

#[tokio::test]
async fn test_same_date_reviews_latest_submission_first() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;

    let first = submit_review(&pool, &ada, shop_id, 2, "2026-08-01").await;
    let second = submit_review(&pool, &ada, shop_id, 5, "2026-08-01").await;

    let reviews = ReviewService::new(&pool)
        .list_for_user(Some(&ada))
        .await
        .expect("history should load");

    assert_eq!(reviews[0].review.id, second);
    assert_eq!(reviews[1].review.id, first);
}

#[tokio::test]
async fn test_shop_listing_carries_reviewer_names() {
    let pool = memory_pool().await;
    let ada = customer_named(&pool, "ada", "Ada", "Lovelace").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    submit_review(&pool, &ada, shop_id, 4, "2026-08-01").await;

    let reviews = ReviewService::new(&pool)
        .list_for_shop(shop_id)
        .await
        .expect("shop reviews should load");

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].reviewer_first_name, "Ada");
    assert_eq!(reviews[0].reviewer_last_name, "Lovelace");
}

// ============================================================================
// Aggregates
// ============================================================================

#[tokio::test]
async fn test_averages_per_shop() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;
    let rated = shop(&pool, "Rated Shop", "Leeds").await;
    shop(&pool, "Quiet Shop", "York").await;

    submit_review(&pool, &ada, rated, 2, "2026-08-01").await;
    submit_review(&pool, &ada, rated, 4, "2026-08-02").await;
    submit_review(&pool, &ada, rated, 5, "2026-08-03").await;

    let averages = ReviewService::new(&pool)
        .averages_per_shop()
        .await
        .expect("averages should load");

    // Sorted by shop name, and shops without reviews still appear
    assert_eq!(averages.len(), 2);
    assert_eq!(averages[0].name, "Quiet Shop");
    assert_eq!(averages[0].average, None);
    assert_eq!(averages[0].review_count, 0);

    assert_eq!(averages[1].name, "Rated Shop");
    assert_eq!(averages[1].shop_id, rated);
    assert_eq!(averages[1].review_count, 3);
    let average = averages[1].average.expect("rated shop should have an average");
    assert!((average - 11.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_one_star_contacts_filter_and_order() {
    let pool = memory_pool().await;
    let boss = admin(&pool, "boss").await;
    let zoe = customer_named(&pool, "zoe", "Zoe", "Zimmer").await;
    let amy = customer_named(&pool, "amy", "Amy", "Able").await;

    let beta = shop(&pool, "Beta Shop", "Leeds").await;
    let alpha = shop(&pool, "Alpha Shop", "York").await;

    submit_review(&pool, &zoe, beta, 1, "2026-08-01").await;
    submit_review(&pool, &amy, beta, 1, "2026-08-02").await;
    submit_review(&pool, &zoe, alpha, 1, "2026-08-03").await;
    // Higher ratings never show up here
    submit_review(&pool, &amy, alpha, 5, "2026-08-04").await;

    let contacts = ReviewService::new(&pool)
        .one_star_contacts(Some(&boss))
        .await
        .expect("contacts should load");

    let summary: Vec<(&str, &str)> = contacts
        .iter()
        .map(|c| (c.shop_name.as_str(), c.last_name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Alpha Shop", "Zimmer"),
            ("Beta Shop", "Able"),
            ("Beta Shop", "Zimmer"),
        ]
    );

    // Contact details come through for follow-up
    assert_eq!(contacts[0].email.as_str(), "zoe@example.com");
    assert_eq!(contacts[0].phone, "0100 000000");
    assert_eq!(contacts[0].review_date, date("2026-08-03"));
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_admin_cannot_act_as_customer() {
    let pool = memory_pool().await;
    let boss = admin(&pool, "boss").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    let service = ReviewService::new(&pool);

    let submission = ReviewSubmission {
        shop_id: shop_id.as_i64(),
        rating: 5,
        body: None,
        review_date: Some("2026-08-01"),
    };
    let submit = service.submit(Some(&boss), &submission).await;
    let history = service.list_for_user(Some(&boss)).await;

    assert!(matches!(
        submit,
        Err(ReviewError::Denied(AccessError::Forbidden))
    ));
    assert!(matches!(
        history,
        Err(ReviewError::Denied(AccessError::Forbidden))
    ));
}

#[tokio::test]
async fn test_customer_cannot_read_one_star_contacts() {
    let pool = memory_pool().await;
    let ada = customer(&pool, "ada").await;

    let err = ReviewService::new(&pool)
        .one_star_contacts(Some(&ada))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReviewError::Denied(AccessError::Forbidden)
    ));
}

#[tokio::test]
async fn test_denied_submission_writes_nothing() {
    let pool = memory_pool().await;
    let boss = admin(&pool, "boss").await;
    let shop_id = shop(&pool, "Corner Shop", "Leeds").await;
    let service = ReviewService::new(&pool);

    let submission = ReviewSubmission {
        shop_id: shop_id.as_i64(),
        rating: 5,
        body: None,
        review_date: Some("2026-08-01"),
    };
    let denied_admin = service.submit(Some(&boss), &submission).await;
    let denied_anonymous = service.submit(None, &submission).await;

    assert!(matches!(denied_admin, Err(ReviewError::Denied(_))));
    assert!(matches!(
        denied_anonymous,
        Err(ReviewError::Denied(AccessError::Unauthenticated))
    ));

    let reviews = service
        .list_for_shop(shop_id)
        .await
        .expect("shop reviews should load");
    assert!(reviews.is_empty());
}
