mod common;

use axum::http::{Method, StatusCode};
use common::{initial_blogs, seeded_app, spawn_app};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_blogs_are_returned_as_json() {
    let (app, _) = seeded_app().await;

    let response = app.get("/api/blogs").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.is_json());
    assert_eq!(response.body.as_array().unwrap().len(), initial_blogs().len());
}

#[tokio::test]
async fn test_listed_blogs_have_id_and_expanded_owner() {
    let (app, _) = seeded_app().await;

    let blogs = app.blogs_in_db().await;
    let authors: Vec<_> = blogs.iter().map(|b| b["author"].clone()).collect();
    assert!(authors.contains(&json!("Michael Chan")));

    assert!(blogs[0]["id"].is_string());
    assert!(blogs[0].get("_id").is_none());
    assert_eq!(blogs[0]["user"]["username"], "seeder");
    assert_eq!(blogs[0]["user"]["name"], "Avory Richie");
}

#[tokio::test]
async fn test_viewing_a_blog_succeeds_with_valid_id() {
    let (app, _) = seeded_app().await;
    let blog = app.blogs_in_db().await[0].clone();
    let id = blog["id"].as_str().unwrap();

    let response = app.get(&format!("/api/blogs/{}", id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.is_json());
    assert_eq!(response.body["title"], blog["title"]);
    assert_eq!(response.body["likes"], blog["likes"]);
    assert_eq!(response.body["user"], blog["user"]["id"]);
}

#[tokio::test]
async fn test_viewing_a_missing_blog_is_404() {
    let app = spawn_app().await;
    let response = app
        .get(&format!("/api/blogs/{}", Uuid::new_v4()))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_viewing_with_malformatted_id_is_400() {
    let app = spawn_app().await;
    let response = app.get("/api/blogs/5a3d5da59070081a82a3445").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "malformatted id");
}

#[tokio::test]
async fn test_a_valid_blog_can_be_added() {
    let (app, _) = seeded_app().await;
    let token = app.register_and_login("yrova", "password").await;

    let response = app
        .create_blog(
            &token,
            json!({ "title": "Cats are dope", "author": "Avory Richie", "url": "https://cat.com/", "likes": 98 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.is_json());

    let blogs = app.blogs_in_db().await;
    assert_eq!(blogs.len(), initial_blogs().len() + 1);
    let added = blogs.iter().find(|b| b["title"] == "Cats are dope").unwrap();
    assert_eq!(added["user"]["username"], "yrova");
}

#[tokio::test]
async fn test_adding_without_token_is_401() {
    let (app, _) = seeded_app().await;

    let response = app
        .request(
            Method::POST,
            "/api/blogs",
            None,
            Some(json!({ "title": "Sneaky", "url": "https://sneaky.example" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .create_blog(
            "not-a-real-token",
            json!({ "title": "Sneaky", "url": "https://sneaky.example" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.blogs_in_db().await.len(), initial_blogs().len());
}

#[tokio::test]
async fn test_blog_without_title_is_not_added() {
    let (app, token) = seeded_app().await;

    let response = app
        .create_blog(
            &token,
            json!({ "author": "Avory Richie", "url": "https://cat.com/", "likes": 98 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.blogs_in_db().await.len(), initial_blogs().len());
}

#[tokio::test]
async fn test_blog_without_title_and_url_is_not_added() {
    let (app, token) = seeded_app().await;

    let response = app
        .create_blog(&token, json!({ "author": "Avory Richie" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.blogs_in_db().await.len(), initial_blogs().len());
}

#[tokio::test]
async fn test_missing_likes_default_to_zero() {
    let (app, token) = seeded_app().await;

    let response = app
        .create_blog(
            &token,
            json!({ "title": "Felines are dope", "author": "Melanie Tam", "url": "https://catParty.com/" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let blogs = app.blogs_in_db().await;
    let added = blogs
        .iter()
        .find(|b| b["title"] == "Felines are dope")
        .unwrap();
    assert_eq!(added["likes"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (app, token) = seeded_app().await;

    let response = app
        .create_blog(&token, json!({ "title": "Negative", "url": "https://neg.example", "likes": -3 }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_updating_likes() {
    let (app, _) = seeded_app().await;
    let blog = app.blogs_in_db().await[0].clone();
    let id = blog["id"].as_str().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/blogs/{}", id),
            None,
            Some(json!({ "likes": 100 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["likes"], 100);
    assert_eq!(response.body["title"], blog["title"]);

    let missing = app
        .request(
            Method::PUT,
            &format!("/api/blogs/{}", Uuid::new_v4()),
            None,
            Some(json!({ "likes": 1 })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_can_delete_blog() {
    let (app, token) = seeded_app().await;
    let blog = app.blogs_in_db().await[0].clone();
    let id = blog["id"].as_str().unwrap();

    let response = app
        .request(Method::DELETE, &format!("/api/blogs/{}", id), Some(token.as_str()), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let blogs = app.blogs_in_db().await;
    assert_eq!(blogs.len(), initial_blogs().len() - 1);
    assert!(blogs.iter().all(|b| b["id"] != blog["id"]));
}

#[tokio::test]
async fn test_non_owner_cannot_delete_blog() {
    let (app, _) = seeded_app().await;
    let intruder = app.register_and_login("intruder", "password").await;
    let id = app.blogs_in_db().await[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .request(Method::DELETE, &format!("/api/blogs/{}", id), Some(intruder.as_str()), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "User not owner of blog");
    assert_eq!(app.blogs_in_db().await.len(), initial_blogs().len());
}

#[tokio::test]
async fn test_deleting_missing_blog_is_404() {
    let (app, token) = seeded_app().await;
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/blogs/{}", Uuid::new_v4()),
            Some(token.as_str()),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_over_initial_blogs() {
    let (app, _) = seeded_app().await;

    let response = app.get("/api/stats").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.is_json());

    let stats = response.body;
    assert_eq!(stats["total_likes"], 36);
    assert_eq!(
        stats["favorite_blog"],
        json!({ "title": "Canonical string reduction", "author": "Edsger W. Dijkstra", "likes": 12 })
    );
    assert_eq!(
        stats["most_blogs"],
        json!({ "author": "Robert C. Martin", "blogs": 3 })
    );
    assert_eq!(
        stats["most_likes"],
        json!({ "author": "Edsger W. Dijkstra", "likes": 17 })
    );
}

#[tokio::test]
async fn test_stats_with_no_blogs() {
    let app = spawn_app().await;

    let stats = app.get("/api/stats").await.body;
    assert_eq!(stats["total_likes"], 0);
    assert!(stats["favorite_blog"].is_null());
    assert_eq!(stats["most_blogs"], json!({ "author": null, "blogs": 0 }));
    assert_eq!(stats["most_likes"], json!({ "author": null, "likes": 0 }));
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_stats_saturate_on_huge_like_counts() {
    let app = spawn_app().await;
    let token = app.register_and_login("whale", "password").await;

    for title in ["Viral one", "Viral two", "Viral three"] {
        let response = app
            .create_blog(
                &token,
                json!({ "title": title, "author": "Big Audience", "url": "https://viral.example", "likes": i64::MAX }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app.get("/api/stats").await;
    assert_eq!(response.status, StatusCode::OK);

    let stats = response.body;
    assert_eq!(stats["total_likes"], json!(u64::MAX));
    assert_eq!(stats["favorite_blog"]["title"], "Viral one");
    assert_eq!(
        stats["most_likes"],
        json!({ "author": "Big Audience", "likes": u64::MAX })
    );
    assert_eq!(
        stats["most_blogs"],
        json!({ "author": "Big Audience", "blogs": 3 })
    );
}

#[tokio::test]
async fn test_concurrent_deletes_remove_once() {
    let (app, token) = seeded_app().await;
    let id = app.blogs_in_db().await[0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/blogs/{}", id);

    let (first, second) = tokio::join!(
        app.request(Method::DELETE, &uri, Some(token.as_str()), None),
        app.request(Method::DELETE, &uri, Some(token.as_str()), None),
    );

    let mut statuses = [first.status.as_u16(), second.status.as_u16()];
    statuses.sort();
    assert_eq!(statuses, [204, 404]);
    assert_eq!(app.blogs_in_db().await.len(), initial_blogs().len() - 1);
}
