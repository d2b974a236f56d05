//! End-to-end account, pool and token scenario on SQLite storage

use allyhub_core::{NewEndpointPool, SessionCookie, FALLBACK_POOL_TYPE};
use allyhub_tests::db::TestDatabase;
use allyhub_tests::services::sqlite_services;
use allyhub_tests::CoreError;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_register_login_pool_and_token_lifecycle() {
    let test_db = TestDatabase::new();
    let services = sqlite_services(&test_db);

    // Register, then register again with the same email
    let user = services
        .accounts
        .register("a@example.com", "secret123")
        .await
        .expect("register");
    let err = services
        .accounts
        .register("a@example.com", "other")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)), "got {err:?}");

    // Wrong password: generic failure, no session row
    let err = services
        .accounts
        .login("a@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid credentials");
    {
        let db = test_db.shared();
        let db = db.lock().await;
        let sessions: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(sessions, 0);
    }

    // Correct password: ~24h session
    let before = Utc::now();
    let session = services
        .accounts
        .login("a@example.com", "secret123")
        .await
        .expect("login");
    let lifetime = session.expires_at - before;
    assert!(lifetime <= Duration::hours(24) + Duration::seconds(5));
    assert!(lifetime >= Duration::hours(24) - Duration::seconds(5));
    assert_eq!(SessionCookie::issue(&session).value, session.id);

    let me = services
        .accounts
        .authenticate_session(&session.id)
        .await
        .unwrap();
    assert_eq!(me.id, user.id);

    // Pool from the shipped template
    let pool = services
        .pools
        .create(
            &user.id,
            NewEndpointPool::new("Home").with_type(FALLBACK_POOL_TYPE),
        )
        .await
        .expect("create pool");
    assert_eq!(pool.endpoints.len(), 6);
    assert!(pool.endpoints.values().all(|e| e.url.is_empty()));

    let other_pool = services
        .pools
        .create(&user.id, NewEndpointPool::new("Work"))
        .await
        .unwrap();

    // Token bound to "Home" only
    let token = services
        .tokens
        .create(&user.id, "desktop", &pool.id)
        .await
        .expect("create token");
    let access = services.tokens.authenticate(&token.secret).await.unwrap();
    assert_eq!(access.user_id, user.id);
    assert_eq!(access.pool.id, pool.id);
    assert_ne!(access.pool.id, other_pool.id);

    // Deactivated: the correct secret no longer works
    services
        .tokens
        .deactivate(&user.id, &token.token.id)
        .await
        .unwrap();
    assert!(matches!(
        services.tokens.authenticate(&token.secret).await,
        Err(CoreError::InvalidCredentials)
    ));

    // Dangling: a fresh token stops working once its pool is deleted
    let second = services
        .tokens
        .create(&user.id, "second", &other_pool.id)
        .await
        .unwrap();
    services.pools.delete(&user.id, &other_pool.id).await.unwrap();
    assert!(matches!(
        services.tokens.authenticate(&second.secret).await,
        Err(CoreError::InvalidCredentials)
    ));

    // Logout ends the session
    services.accounts.logout(&session.id).await.unwrap();
    assert!(matches!(
        services.accounts.authenticate_session(&session.id).await,
        Err(CoreError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_two_users_share_a_pool_id_without_seeing_each_other() {
    let test_db = TestDatabase::in_memory();
    let services = sqlite_services(&test_db);

    let a = services
        .accounts
        .register("a@example.com", "pw-a")
        .await
        .unwrap();
    let b = services
        .accounts
        .register("b@example.com", "pw-b")
        .await
        .unwrap();

    services.pools.create_default_pool(&a.id).await.unwrap();
    services.pools.create_default_pool(&b.id).await.unwrap();

    let pool_a = services.pools.get(&a.id, "default").await.unwrap();
    let pool_b = services.pools.get(&b.id, "default").await.unwrap();
    assert_eq!(pool_a.user_id, a.id);
    assert_eq!(pool_b.user_id, b.id);

    // A token b mints for "default" resolves to b's pool
    let token = services
        .tokens
        .create(&b.id, "b-token", "default")
        .await
        .unwrap();
    let access = services.tokens.authenticate(&token.secret).await.unwrap();
    assert_eq!(access.pool.user_id, b.id);
}
