mod common;

use fitsync_api::domain::repositories::CredentialRepository;
use fitsync_api::infrastructure::persistence::PgCredentialRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_verify_matching_password(pool: PgPool) {
    let id = common::create_test_user(&pool, "ann@example.com", "correct horse").await;
    let repo = PgCredentialRepository::new(Arc::new(pool));

    let result = repo.verify("ann@example.com", "correct horse").await.unwrap();

    assert_eq!(result, Some(id));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_verify_mismatch(pool: PgPool) {
    common::create_test_user(&pool, "ann@example.com", "correct horse").await;
    let repo = PgCredentialRepository::new(Arc::new(pool));

    assert!(repo.verify("ann@example.com", "wrong").await.unwrap().is_none());
    assert!(repo.verify("nobody@example.com", "correct horse").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_record_login(pool: PgPool) {
    let id = common::create_test_user(&pool, "ann@example.com", "pw").await;
    let repo = PgCredentialRepository::new(Arc::new(pool.clone()));

    repo.record_login(id).await.unwrap();

    let last_login = sqlx::query_scalar::<_, Option<chrono::DateTime<chrono::Utc>>>(
        "SELECT last_login FROM users WHERE user_id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(last_login.is_some());
}
