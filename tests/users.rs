mod common;

use common::{ok, setup};
use qalpuch::{CreateUserRequest, UpdateUserRequest};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_list_and_get_users() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(ok(200, json!([
            { "id": 1, "name": "User 1" },
            { "id": 2, "name": "User 2" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/1"))
        .respond_with(ok(200, json!({ "id": 1, "name": "User 1", "role": "admin" })))
        .mount(&server)
        .await;

    let users = client.users().list().await.unwrap();
    assert_eq!(users.len(), 2);

    let user = client.users().get(1).await.unwrap();
    assert_eq!(user.name, "User 1");
    assert_eq!(user.role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_create_and_update_user() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .and(body_json(json!({ "name": "Ann", "email": "ann@example.com", "role": "user" })))
        .respond_with(ok(201, json!({ "id": 10, "name": "Ann", "email": "ann@example.com" })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/users/10"))
        .and(body_json(json!({ "name": "Annie" })))
        .respond_with(ok(200, json!({ "id": 10, "name": "Annie", "email": "ann@example.com" })))
        .mount(&server)
        .await;

    let created = client
        .users()
        .create(&CreateUserRequest {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            role: "user".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 10);

    let updated = client
        .users()
        .update(
            10,
            &UpdateUserRequest {
                name: Some("Annie".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Annie");
}

#[tokio::test]
async fn test_delete_user_and_self() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/users/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.users().delete(4).await.unwrap();
    client.users().delete_me().await.unwrap();
}

#[tokio::test]
async fn test_search_encodes_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/search"))
        .and(query_param("q", "ann & co"))
        .respond_with(ok(200, json!([{ "id": 10, "name": "ann & co" }])))
        .mount(&server)
        .await;

    let found = client.users().search("ann & co").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 10);
}
