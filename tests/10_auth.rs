mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::json;

use common::{sign, token_for, TestApp, SECRET};
use lifedrop_api::database::models::Role;

#[tokio::test]
async fn missing_credential_is_401_without_store_access() -> Result<()> {
    let app = TestApp::new();

    for (method, uri) in [
        (Method::GET, "/users"),
        (Method::GET, "/donations"),
        (Method::GET, "/fundings"),
        (Method::GET, "/admin/dashboard-stats"),
        (Method::POST, "/blogs"),
    ] {
        let (status, body) = app.send(method, uri, None, Some(json!({"title": "x"}))).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }
    assert_eq!(app.store.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn wrong_scheme_and_empty_token_are_401() -> Result<()> {
    let app = TestApp::new();
    let request = |value: &'static str| {
        axum::http::Request::builder()
            .uri("/donations")
            .header("authorization", value)
            .body(axum::body::Body::empty())
    };

    for value in ["Basic dXNlcjpwYXNz", "Bearer ", "Token abc"] {
        use tower::ServiceExt;
        let response = app.router.clone().oneshot(request(value)?).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", value);
    }
    Ok(())
}

#[tokio::test]
async fn unverifiable_token_is_403() -> Result<()> {
    let app = TestApp::new();

    let expired = sign("donor@lifedrop.app", Duration::hours(-2), SECRET);
    let foreign = sign("donor@lifedrop.app", Duration::hours(1), "someone-else");

    for token in [expired.as_str(), foreign.as_str(), "not.a.jwt"] {
        let (status, body) = app.get("/donations", Some(token)).await?;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }
    assert_eq!(app.store.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn role_outside_allowed_set_is_403_after_one_lookup() -> Result<()> {
    let app = TestApp::new();
    app.seed_account("donor@lifedrop.app", Role::Donor).await?;
    let before = app.store.call_count();

    let (status, _) = app.get("/users", Some(&token_for("donor@lifedrop.app"))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.call_count() - before, 1);
    Ok(())
}

#[tokio::test]
async fn unknown_account_is_403() -> Result<()> {
    let app = TestApp::new();
    let (status, _) = app
        .get("/admin/dashboard-stats", Some(&token_for("ghost@lifedrop.app")))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn rejected_caller_mutates_nothing() -> Result<()> {
    let app = TestApp::new();
    app.seed_account("volunteer@lifedrop.app", Role::Volunteer).await?;
    let blog = app
        .seed(
            lifedrop_api::database::Collection::Blogs,
            json!({"title": "t", "content": "c", "status": "draft",
                   "author": {"uid": "u", "email": "a@b.c"}}),
        )
        .await?;

    // Deleting a blog is admin-only.
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/blogs/{}", blog),
            Some(&token_for("volunteer@lifedrop.app")),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::DELETE, &format!("/blogs/{}", blog), None, None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = token_for("admin@lifedrop.app");
    app.seed_account("admin@lifedrop.app", Role::Admin).await?;
    let (status, page) = app.get("/blogs", Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalCount"], 1);
    Ok(())
}

#[tokio::test]
async fn allowed_roles_pass_both_gates() -> Result<()> {
    let app = TestApp::new();
    app.seed_account("admin@lifedrop.app", Role::Admin).await?;
    app.seed_account("volunteer@lifedrop.app", Role::Volunteer).await?;

    let (status, stats) = app
        .get("/admin/dashboard-stats", Some(&token_for("volunteer@lifedrop.app")))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalRequests"], 0);

    // Volunteers are staff but not admins.
    let (status, _) = app.get("/users", Some(&token_for("volunteer@lifedrop.app"))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, page) = app.get("/users", Some(&token_for("admin@lifedrop.app"))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalCount"], 2);
    Ok(())
}
