//! EndpointPoolService tests

use allyhub_core::{EndpointPoolUpdate, NewEndpointPool, FALLBACK_POOL_TYPE};
use allyhub_tests::services::{mock_services, mock_services_with_registry};
use allyhub_tests::{CoreError, MockRepositories, PoolTypeRegistry};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_shipped_type_seeds_six_endpoints() {
    let repos = MockRepositories::new();
    let services = mock_services(&repos);

    assert_eq!(services.pools.pool_types(), vec![FALLBACK_POOL_TYPE]);

    let pool = services
        .pools
        .create("user-1", NewEndpointPool::new("Home"))
        .await
        .unwrap();

    let names: Vec<_> = pool.endpoints.keys().cloned().collect();
    assert_eq!(
        names,
        vec![
            "chat_history",
            "chat_stream",
            "notifications_fetch",
            "notifications_status",
            "tasks_fetch",
            "tasks_update",
        ]
    );
    assert!(pool.endpoints.values().all(|e| e.url.is_empty()));
    assert_eq!(pool.endpoints["chat_stream"].method, "POST");
}

#[tokio::test]
async fn test_unloaded_registry_still_accepts_fallback_type() {
    let repos = MockRepositories::new();
    let services = mock_services_with_registry(&repos, PoolTypeRegistry::unset());

    let pool = services
        .pools
        .create(
            "user-1",
            NewEndpointPool::new("Home").with_type(FALLBACK_POOL_TYPE),
        )
        .await
        .unwrap();
    assert_eq!(pool.pool_type, FALLBACK_POOL_TYPE);
    assert!(pool.endpoints.is_empty());

    let err = services
        .pools
        .create("user-1", NewEndpointPool::new("Other").with_type("Custom"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn test_type_names_are_case_sensitive() {
    let repos = MockRepositories::new();
    let services = mock_services(&repos);

    let err = services
        .pools
        .create(
            "user-1",
            NewEndpointPool::new("Home").with_type("allyhub desktop app"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn test_configure_then_read_allyhub_view() {
    let repos = MockRepositories::new();
    let services = mock_services(&repos);
    let pool = services
        .pools
        .create("user-1", NewEndpointPool::new("Home"))
        .await
        .unwrap();

    let mut endpoints = pool.endpoints.clone();
    endpoints.get_mut("tasks_fetch").unwrap().url = "https://tasks.example.com".into();
    endpoints.get_mut("chat_stream").unwrap().url = "https://chat.example.com/stream".into();
    endpoints.remove("notifications_status");

    let updated = services
        .pools
        .update(
            "user-1",
            &pool.id,
            EndpointPoolUpdate {
                name: "Home".into(),
                description: "configured".into(),
                endpoints,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.pool_type, pool.pool_type);
    assert_eq!(updated.created_at, pool.created_at);

    let view = services
        .pools
        .allyhub_endpoints("user-1", &pool.id)
        .await
        .unwrap();
    assert_eq!(view.tasks_fetch, "https://tasks.example.com");
    assert_eq!(view.chat_stream, "https://chat.example.com/stream");
    assert_eq!(view.tasks_update, "");
    assert_eq!(view.notifications_status, "");
}

#[tokio::test]
async fn test_update_rejects_empty_name() {
    let repos = MockRepositories::new();
    let services = mock_services(&repos);
    let pool = services
        .pools
        .create("user-1", NewEndpointPool::new("Home"))
        .await
        .unwrap();

    let err = services
        .pools
        .update("user-1", &pool.id, EndpointPoolUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn test_pools_are_scoped_to_their_owner() {
    let repos = MockRepositories::new();
    let services = mock_services(&repos);
    let pool = services
        .pools
        .create("user-1", NewEndpointPool::new("Home"))
        .await
        .unwrap();

    assert!(matches!(
        services.pools.get("user-2", &pool.id).await,
        Err(CoreError::NotFound(_))
    ));
    assert!(services.pools.list("user-2").await.unwrap().is_empty());

    services.pools.delete("user-2", &pool.id).await.unwrap();
    assert!(services.pools.get("user-1", &pool.id).await.is_ok());
}

#[tokio::test]
async fn test_default_pool_is_created_once() {
    let repos = MockRepositories::new();
    let services = mock_services(&repos);

    let pool = services.pools.create_default_pool("user-1").await.unwrap();
    assert!(pool.is_default);
    assert_eq!(pool.id, "default");
    assert_eq!(pool.endpoints.len(), 6);

    let err = services
        .pools
        .create_default_pool("user-1")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));

    // Another user gets their own default pool with the same id.
    services.pools.create_default_pool("user-2").await.unwrap();
}
