//! Session and API token repository integration tests

use allyhub_core::repository::{ApiTokenRepository, SessionRepository, UserRepository};
use allyhub_core::{hash_secret, ApiTokenManager, IssuedApiToken, SessionManager};
use allyhub_storage::{SqliteApiTokenRepository, SqliteSessionRepository, SqliteUserRepository};
use allyhub_tests::{db::TestDatabase, fixtures};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

async fn user(test_db: &TestDatabase) -> String {
    let user = fixtures::test_user("a@example.com");
    SqliteUserRepository::new(test_db.shared())
        .create(&user)
        .await
        .unwrap();
    user.id
}

#[tokio::test]
async fn test_session_survives_reload_with_exact_expiry() {
    let test_db = TestDatabase::new();
    let user_id = user(&test_db).await;
    let repo = SqliteSessionRepository::new(test_db.shared());

    let session = SessionManager::new().create_session(&user_id).unwrap();
    repo.create(&session).await.unwrap();

    let loaded = repo.get(&session.id).await.unwrap();
    assert_eq!(loaded, session);
    assert_eq!(loaded.expires_at - loaded.created_at, Duration::hours(24));
}

#[tokio::test]
async fn test_sweep_leaves_live_sessions() {
    let test_db = TestDatabase::in_memory();
    let user_id = user(&test_db).await;
    let repo = SqliteSessionRepository::new(test_db.shared());
    let manager = SessionManager::new();
    let now = Utc::now();

    let stale = manager
        .create_session_at(&user_id, now - Duration::hours(30))
        .unwrap();
    let live = manager.create_session_at(&user_id, now).unwrap();
    repo.create(&stale).await.unwrap();
    repo.create(&live).await.unwrap();

    assert_eq!(repo.delete_expired(now).await.unwrap(), 1);
    assert!(repo.get(&stale.id).await.unwrap_err().is_not_found());
    assert_eq!(repo.get(&live.id).await.unwrap(), live);
}

#[tokio::test]
async fn test_token_lookup_by_digest_and_deactivation() {
    let test_db = TestDatabase::in_memory();
    let user_id = user(&test_db).await;
    let repo = SqliteApiTokenRepository::new(test_db.shared());
    let manager = ApiTokenManager::new();

    let IssuedApiToken { mut token, secret } =
        manager.create_token(&user_id, "CI", "pool-1").unwrap();
    repo.create(&token).await.unwrap();

    let found = repo.find_by_hash(&hash_secret(&secret)).await.unwrap();
    assert_eq!(found, token);
    assert!(manager.validate(&secret, &found));
    assert!(repo.find_by_hash(&secret).await.unwrap_err().is_not_found());

    token.active = false;
    repo.update(&token).await.unwrap();
    let found = repo.find_by_hash(&hash_secret(&secret)).await.unwrap();
    assert!(!manager.validate(&secret, &found));
}

#[tokio::test]
async fn test_usage_stamp_does_not_reactivate_a_revoked_token() {
    let test_db = TestDatabase::in_memory();
    let user_id = user(&test_db).await;
    let repo = SqliteApiTokenRepository::new(test_db.shared());
    let issued = ApiTokenManager::new()
        .create_token(&user_id, "CI", "pool-1")
        .unwrap();
    repo.create(&issued.token).await.unwrap();

    // Snapshot read while active, then revoked before the stamp lands
    let snapshot = repo.get(&issued.token.id).await.unwrap();
    let mut revoked = snapshot.clone();
    revoked.active = false;
    repo.update(&revoked).await.unwrap();

    assert!(!repo.touch_last_used(&snapshot.id, Utc::now()).await.unwrap());
    let stored = repo.get(&snapshot.id).await.unwrap();
    assert!(!stored.active);
    assert_eq!(stored.last_used_at, None);
}

#[tokio::test]
async fn test_tokens_are_listed_per_user() {
    let test_db = TestDatabase::in_memory();
    let user_id = user(&test_db).await;
    let other = fixtures::test_user("b@example.com");
    SqliteUserRepository::new(test_db.shared())
        .create(&other)
        .await
        .unwrap();
    let repo = SqliteApiTokenRepository::new(test_db.shared());
    let manager = ApiTokenManager::new();

    repo.create(&manager.create_token(&user_id, "one", "p").unwrap().token)
        .await
        .unwrap();
    repo.create(&manager.create_token(&other.id, "two", "p").unwrap().token)
        .await
        .unwrap();

    let names: Vec<_> = repo
        .list_for_user(&user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["one"]);
}
