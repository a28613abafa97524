mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{token_for, TestApp};
use lifedrop_api::database::models::Role;

#[tokio::test]
async fn staff_draft_and_admin_publish() -> Result<()> {
    let app = TestApp::new();
    app.seed_account("admin@lifedrop.app", Role::Admin).await?;
    app.seed_account("vol@lifedrop.app", Role::Volunteer).await?;
    let volunteer = token_for("vol@lifedrop.app");
    let admin = token_for("admin@lifedrop.app");

    let (status, created) = app
        .send(
            Method::POST,
            "/blogs",
            Some(&volunteer),
            Some(json!({"title": "Why give blood", "content": "It saves lives.", "status": "published"})),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["insertedId"].as_str().unwrap_or_default().to_string();

    // Drafts are not public.
    let (_, published) = app.get("/blogs/published", None).await?;
    assert_eq!(published["totalCount"], 0);

    let (_, drafts) = app.get("/blogs?status=draft", Some(&volunteer)).await?;
    assert_eq!(drafts["totalCount"], 1);
    assert_eq!(drafts["items"][0]["author"]["email"], "vol@lifedrop.app");
    assert_eq!(drafts["items"][0]["status"], "draft");

    let uri = format!("/blogs/{}/status", id);
    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&volunteer), Some(json!({"status": "published"})))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&admin), Some(json!({"status": "published"})))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, published) = app.get("/blogs/published", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["totalCount"], 1);
    assert_eq!(published["items"][0]["title"], "Why give blood");
    Ok(())
}

#[tokio::test]
async fn create_requires_title_and_content() -> Result<()> {
    let app = TestApp::new();
    app.seed_account("admin@lifedrop.app", Role::Admin).await?;

    let (status, body) = app
        .send(
            Method::POST,
            "/blogs",
            Some(&token_for("admin@lifedrop.app")),
            Some(json!({"title": "No body"})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title and content are required");
    Ok(())
}

#[tokio::test]
async fn admin_deletes_posts() -> Result<()> {
    let app = TestApp::new();
    app.seed_account("admin@lifedrop.app", Role::Admin).await?;
    let admin = token_for("admin@lifedrop.app");

    let (_, created) = app
        .send(
            Method::POST,
            "/blogs",
            Some(&admin),
            Some(json!({"title": "Old news", "content": "..."})),
        )
        .await?;
    let uri = format!("/blogs/{}", created["insertedId"].as_str().unwrap_or_default());

    let (status, body) = app.send(Method::DELETE, &uri, Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 1);

    let (status, body) = app.send(Method::DELETE, &uri, Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Blog not found");
    Ok(())
}

#[tokio::test]
async fn malformed_blog_id_is_400_before_role_lookup() -> Result<()> {
    let app = TestApp::new();
    app.seed_account("admin@lifedrop.app", Role::Admin).await?;
    let admin = token_for("admin@lifedrop.app");
    let seeded = app.store.call_count();

    for (method, uri, body) in [
        (Method::PATCH, "/blogs/123/status", Some(json!({"status": "published"}))),
        (Method::DELETE, "/blogs/123", None),
    ] {
        let (status, body) = app.send(method, uri, Some(&admin), body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }
    assert_eq!(app.store.call_count(), seeded);
    Ok(())
}
