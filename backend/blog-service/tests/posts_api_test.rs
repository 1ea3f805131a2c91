//! Integration Tests: Posts API
//!
//! Drives the full router (auth middleware, handlers, services) against the
//! in-memory store.
//!
//! Coverage:
//! - Anonymous reads, authenticated creation, author assignment
//! - Ownership enforcement on update/delete (403) and 401 for anonymous writes
//! - PUT vs PATCH field semantics, explicit null clears nullable fields
//! - 404 before 403, delete-twice behavior, list ordering and paging

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use blog_service::build_app;
use common::{id_of, TestContext};
use serde_json::{json, Value};

#[actix_web::test]
async fn test_alice_creates_bob_is_forbidden_alice_patches() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let (_, bob) = ctx.user("bob").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(json!({"text": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["author"], "alice");
    assert_eq!(post["text"], "hi");
    assert!(post["group"].is_null());
    let id = id_of(&post);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}/", id))
        .insert_header((header::AUTHORIZATION, bob))
        .set_json(json!({"text": "pwned"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}/", id))
        .insert_header((header::AUTHORIZATION, alice))
        .set_json(json!({"text": "hi2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["text"], "hi2");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/", id))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["text"], "hi2");
}

#[actix_web::test]
async fn test_author_in_body_is_ignored() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    ctx.user("mallory").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, alice))
        .set_json(json!({"text": "hi", "author": "mallory", "pub_date": "2001-01-01T00:00:00Z"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["author"], "alice");
    assert_ne!(post["pub_date"], "2001-01-01T00:00:00Z");
}

#[actix_web::test]
async fn test_anonymous_writes_are_unauthorized_and_change_nothing() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, alice))
        .set_json(json!({"text": "original"}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/posts/{}/", id_of(&post));

    let attempts = vec![
        test::TestRequest::post()
            .uri("/api/v1/posts/")
            .set_json(json!({"text": "anon"})),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({"text": "anon"})),
        test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({"text": "anon"})),
        test::TestRequest::delete().uri(&uri),
    ];
    for attempt in attempts {
        let resp = test::call_service(&app, attempt.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 401);
    }

    let req = test::TestRequest::get().uri("/api/v1/posts/").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.as_array().map(Vec::len), Some(1));
    assert_eq!(posts[0]["text"], "original");
}

#[actix_web::test]
async fn test_anonymous_malformed_body_is_still_unauthorized() {
    let ctx = TestContext::new();
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_non_owner_cannot_modify_and_post_is_unchanged() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let (_, bob) = ctx.user("bob").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, alice))
        .set_json(json!({"text": "mine", "image": "cat.png"}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/posts/{}/", id_of(&post));

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, bob.clone()))
        .set_json(json!({"text": "theirs"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("permission"));

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, bob.clone()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // Ownership is decided before the payload is looked at.
    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, bob))
        .set_json(json!({"text": ""}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::get().uri(&uri).to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after, post);
}

#[actix_web::test]
async fn test_put_requires_text_and_patch_keeps_omitted_fields() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let group = ctx.group("Rust", "rust").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(json!({"text": "hi", "image": "cat.png", "group": group.id}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["group"], group.id.to_string());
    let uri = format!("/api/v1/posts/{}", id_of(&post));

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(json!({"image": "dog.png"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"]["text"][0], "This field is required.");

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(json!({"image": "dog.png"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Value = test::read_body_json(resp).await;
    assert_eq!(patched["image"], "dog.png");
    assert_eq!(patched["text"], "hi");
    assert_eq!(patched["group"], group.id.to_string());
    assert_eq!(patched["pub_date"], post["pub_date"]);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, alice))
        .set_json(json!({"text": "replaced"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: Value = test::read_body_json(resp).await;
    assert_eq!(replaced["text"], "replaced");
    assert_eq!(replaced["author"], "alice");
}

#[actix_web::test]
async fn test_explicit_null_clears_image_and_group() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let group = ctx.group("Rust", "rust").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(json!({"text": "hi", "image": "cat.png", "group": group.id}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/posts/{}/", id_of(&post));

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(json!({"image": null}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Value = test::read_body_json(resp).await;
    assert!(patched["image"].is_null());
    assert_eq!(patched["group"], group.id.to_string());

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, alice))
        .set_json(json!({"text": "ungrouped", "group": null}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored["text"], "ungrouped");
    assert!(stored["group"].is_null());
    assert!(stored["image"].is_null());
}

#[actix_web::test]
async fn test_validation_errors_are_field_keyed() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(json!({"text": "   ", "image": "x".repeat(300), "group": uuid::Uuid::new_v4()}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert!(body["fields"]["text"].is_array());
    assert!(body["fields"]["image"].is_array());
    assert!(body["fields"]["group"][0]
        .as_str()
        .unwrap()
        .contains("does not exist"));

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, alice))
        .set_json(json!({"text": 42}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get().uri("/api/v1/posts/").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts, json!([]));
}

#[actix_web::test]
async fn test_missing_post_is_404_before_403() {
    let ctx = TestContext::new();
    let (_, bob) = ctx.user("bob").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;
    let uri = format!("/api/v1/posts/{}/", uuid::Uuid::new_v4());

    for req in [
        test::TestRequest::get().uri(&uri),
        test::TestRequest::patch()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, bob.clone()))
            .set_json(json!({"text": "x"})),
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, bob.clone())),
    ] {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/not-a-uuid/")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_delete_twice_is_204_then_404() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/")
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .set_json(json!({"text": "short-lived"}))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/posts/{}/", id_of(&post));

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, alice.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, alice))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_list_is_newest_first_and_paged() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let app = test::init_service(build_app(ctx.state.clone())).await;

    for text in ["one", "two", "three"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/posts/")
            .insert_header((header::AUTHORIZATION, alice.clone()))
            .set_json(json!({"text": text}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::get().uri("/api/v1/posts/").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    let texts: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["three", "two", "one"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/?limit=1&offset=1")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.as_array().map(Vec::len), Some(1));
    assert_eq!(page[0]["text"], "two");

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/?limit=0")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}
