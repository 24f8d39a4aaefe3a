//! Tags, profiles and user administration

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::json;

use common::{admin, answer, ask, bearer, register, send};

#[actix_web::test]
async fn test_tag_create_and_top() {
    let state = common::app_state().await;
    let app = init_app!(state);
    let (_, alice) = register(&app, "alice").await;

    let create = |name: &str| {
        test::TestRequest::post()
            .uri("/tags/")
            .insert_header(bearer(&alice))
            .set_json(json!({ "name": name }))
            .to_request()
    };

    let (status, body) = send(&app, create("unused")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 0);
    let unused_id = body["id"].as_i64().unwrap();
    assert_eq!(body["questions"], format!("/tags/{}/questions/", unused_id));

    let (status, body) = send(&app, create("unused")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 20005);

    let (status, _) = send(&app, create("two words")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ask(&app, &alice, "One", &["rust", "sql"]).await;
    ask(&app, &alice, "Two", &["rust"]).await;

    let req = test::TestRequest::get()
        .uri("/tags/?sort=-rating&limit=2")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["rust", "sql"]);

    let req = test::TestRequest::get().uri("/tags/").to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["pageItems"][0]["name"], "rust");

    // a lone sort key keeps the paginated listing
    let req = test::TestRequest::get().uri("/tags/?sort=rating").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 3);
}

#[actix_web::test]
async fn test_tag_questions_and_delete() {
    let state = common::app_state().await;
    let app = init_app!(state);
    let (_, alice) = register(&app, "alice").await;
    let (_, root) = admin(&app, &state, "root").await;
    ask(&app, &alice, "Tagged", &["rust"]).await;
    ask(&app, &alice, "Untagged", &[]).await;

    let rust = state.persistence().tag_find_by_name("rust").await.unwrap().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/tags/{}/questions/", rust.id))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["pageItems"][0]["title"], "Tagged");

    let delete = |token: &str| {
        test::TestRequest::delete()
            .uri(&format!("/tags/{}/", rust.id))
            .insert_header(bearer(token))
            .to_request()
    };

    let (status, _) = send(&app, delete(&alice)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, delete(&root)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, delete(&root)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/tags/{}/questions/", rust.id))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_top_profiles_are_public_without_email() {
    let state = common::app_state().await;
    let app = init_app!(state);
    let (_, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let question = ask(&app, &alice, "Popular", &[]).await;

    let req = test::TestRequest::post()
        .uri(&format!("/questions/{}/set_like/", question))
        .insert_header(bearer(&bob))
        .to_request();
    send(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/profiles/?sort=-rating&limit=1")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let top = body.as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["username"], "alice");
    assert_eq!(top[0]["rating"], 1);
    assert!(top[0]["email"].is_null());

    for uri in ["/profiles/", "/profiles/?sort=rating", "/profiles/?limit=5"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[actix_web::test]
async fn test_profile_update() {
    let state = common::app_state().await;
    let app = init_app!(state);
    let (alice_id, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;

    let patch = |token: &str, payload: serde_json::Value| {
        test::TestRequest::patch()
            .uri(&format!("/profiles/{}/", alice_id))
            .insert_header(bearer(token))
            .set_json(payload)
            .to_request()
    };

    let (status, _) = send(&app, patch(&bob, json!({ "email": "bob@evil.com" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        patch(
            &alice,
            json!({ "email": "new@example.com", "avatar": "https://img.example.com/a.png" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["avatar"], "https://img.example.com/a.png");

    let (status, _) = send(&app, patch(&alice, json!({ "avatar": "javascript:alert(1)" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, patch(&alice, json!({ "avatar": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["avatar"].is_null());
    assert_eq!(body["email"], "new@example.com");

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}/profile/{}/", alice_id, alice_id))
        .insert_header(bearer(&alice))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], format!("/profiles/{}/", alice_id));

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}/profile/{}/", alice_id, alice_id + 1))
        .insert_header(bearer(&alice))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_user_admin_endpoints() {
    let state = common::app_state().await;
    let app = init_app!(state);
    let (alice_id, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let (_, root) = admin(&app, &state, "root").await;

    let question = ask(&app, &alice, "Doomed", &["gone"]).await;
    answer(&app, &bob, question, "still here?").await;

    let req = test::TestRequest::get()
        .uri("/users/")
        .insert_header(bearer(&alice))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/users/")
        .insert_header(bearer(&root))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 3);

    let req = test::TestRequest::delete()
        .uri(&format!("/users/{}/", alice_id))
        .insert_header(bearer(&root))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/auth/user/")
        .insert_header(bearer(&alice))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri(&format!("/questions/{}/", question))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let gone = state.persistence().tag_find_by_name("gone").await.unwrap().unwrap();
    assert_eq!(gone.rating, 0);

    let req = test::TestRequest::delete()
        .uri(&format!("/users/{}/", alice_id))
        .insert_header(bearer(&root))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_root_lists_entry_points() {
    let state = common::app_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"], "/questions/");
    assert_eq!(body["tags"], "/tags/");
}
