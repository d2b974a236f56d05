//! Endpoint pool repository integration tests

use allyhub_core::repository::{EndpointPoolRepository, UserRepository};
use allyhub_core::{decode_endpoints, encode_endpoints, EndpointMap, EndpointUrl};
use allyhub_storage::{SqliteEndpointPoolRepository, SqliteUserRepository};
use allyhub_tests::{db::TestDatabase, fixtures};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

async fn with_users(test_db: &TestDatabase, emails: &[&str]) -> Vec<String> {
    let users = SqliteUserRepository::new(test_db.shared());
    let mut ids = Vec::new();
    for email in emails {
        let user = fixtures::test_user(email);
        users.create(&user).await.unwrap();
        ids.push(user.id);
    }
    ids
}

#[tokio::test]
async fn test_pool_is_never_visible_to_another_user() {
    let test_db = TestDatabase::new();
    let ids = with_users(&test_db, &["a@example.com", "b@example.com"]).await;
    let (alice, bob) = (&ids[0], &ids[1]);
    let repo = SqliteEndpointPoolRepository::new(test_db.shared());

    repo.create(&fixtures::test_pool(alice, "1", "Alice home"))
        .await
        .unwrap();

    assert!(repo.get(bob, "1").await.unwrap_err().is_not_found());
    assert!(repo.list_for_user(bob).await.unwrap().is_empty());

    // Bob may reuse the id; each user keeps their own row.
    repo.create(&fixtures::test_pool(bob, "1", "Bob home"))
        .await
        .unwrap();
    assert_eq!(repo.get(alice, "1").await.unwrap().name, "Alice home");
    assert_eq!(repo.get(bob, "1").await.unwrap().name, "Bob home");

    let mut hijack = repo.get(bob, "1").await.unwrap();
    hijack.name = "Bob renamed".into();
    repo.update(&hijack).await.unwrap();
    assert_eq!(repo.get(alice, "1").await.unwrap().name, "Alice home");
}

#[tokio::test]
async fn test_full_pool_roundtrip_including_headers() {
    let test_db = TestDatabase::in_memory();
    let ids = with_users(&test_db, &["a@example.com"]).await;
    let repo = SqliteEndpointPoolRepository::new(test_db.shared());

    let mut endpoints = EndpointMap::new();
    endpoints.insert(
        "chat_stream".into(),
        EndpointUrl::new("https://chat.example.com/stream", "POST")
            .with_header("Authorization", "Bearer upstream")
            .with_description("Stream chat messages"),
    );
    endpoints.insert("tasks_fetch".into(), EndpointUrl::new("", "GET"));

    let pool = fixtures::test_pool(&ids[0], "p", "Work").with_endpoints(endpoints);
    repo.create(&pool).await.unwrap();

    assert_eq!(repo.get(&ids[0], "p").await.unwrap(), pool);
}

#[tokio::test]
async fn test_stored_endpoints_are_a_json_object() {
    let test_db = TestDatabase::in_memory();
    let ids = with_users(&test_db, &["a@example.com"]).await;
    let repo = SqliteEndpointPoolRepository::new(test_db.shared());

    let pool = fixtures::test_pool(&ids[0], "empty", "Empty").with_endpoints(EndpointMap::new());
    repo.create(&pool).await.unwrap();

    let db = test_db.shared();
    let db = db.lock().await;
    let raw: String = db
        .connection()
        .query_row(
            "SELECT endpoints FROM endpoint_pools WHERE id = 'empty'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(raw, "{}");
    assert_eq!(decode_endpoints(&raw), EndpointMap::new());
    assert_eq!(encode_endpoints(&EndpointMap::new()), raw);
}

#[tokio::test]
async fn test_undecodable_endpoints_read_as_empty_map() {
    let test_db = TestDatabase::in_memory();
    let ids = with_users(&test_db, &["a@example.com"]).await;
    let repo = SqliteEndpointPoolRepository::new(test_db.shared());

    for (id, raw) in [("blank", "''"), ("garbage", "'{{{'"), ("array", "'[1,2]'"), ("null", "'null'")] {
        repo.create(&fixtures::test_pool(&ids[0], id, id)).await.unwrap();
        test_db
            .execute(&format!(
                "UPDATE endpoint_pools SET endpoints = {raw} WHERE id = '{id}'"
            ))
            .await;
    }

    for id in ["blank", "garbage", "array", "null"] {
        let pool = repo.get(&ids[0], id).await.unwrap();
        assert!(pool.endpoints.is_empty(), "{id} should decode to empty");
    }
    assert_eq!(repo.list_for_user(&ids[0]).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_listing_orders_default_then_creation_time() {
    let test_db = TestDatabase::in_memory();
    let ids = with_users(&test_db, &["a@example.com"]).await;
    let user = &ids[0];
    let repo = SqliteEndpointPoolRepository::new(test_db.shared());
    let now = Utc::now();

    for (id, age_hours) in [("b", 1), ("a", 3), ("c", 2)] {
        let mut pool = fixtures::test_pool(user, id, id);
        pool.created_at = now - Duration::hours(age_hours);
        repo.create(&pool).await.unwrap();
    }
    let mut default = allyhub_core::EndpointPool::default_for(user.as_str());
    default.created_at = now;
    repo.create(&default).await.unwrap();

    let order: Vec<_> = repo
        .list_for_user(user)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(order, vec!["default", "a", "c", "b"]);
}

#[tokio::test]
async fn test_delete_only_touches_the_owners_row() {
    let test_db = TestDatabase::in_memory();
    let ids = with_users(&test_db, &["a@example.com", "b@example.com"]).await;
    let repo = SqliteEndpointPoolRepository::new(test_db.shared());

    repo.create(&fixtures::test_pool(&ids[0], "x", "A")).await.unwrap();
    repo.create(&fixtures::test_pool(&ids[1], "x", "B")).await.unwrap();

    repo.delete(&ids[1], "x").await.unwrap();
    repo.delete(&ids[1], "x").await.unwrap();

    assert!(repo.get(&ids[0], "x").await.is_ok());
    assert!(repo.get(&ids[1], "x").await.unwrap_err().is_not_found());
}
