//! Routing, status codes, and body handling of the REST front-end.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_wrong_method_is_405() {
    let test = TestServer::new().await;

    for (method, uri) in [
        ("GET", "/email/create"),
        ("POST", "/email/get"),
        ("PUT", "/email/get/batch"),
        ("POST", "/email/update"),
        ("DELETE", "/email/delete"),
    ] {
        let (status, _) = test.rest_raw(method, uri, r#"{"email": "a@x.com"}"#).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
    }

    // Nothing was created by the rejected POST/PUT calls.
    let (_, page) = test
        .rest("GET", "/email/get/batch", &json!({"page": 1, "count": 10}))
        .await;
    assert_eq!(page, json!([]));
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let test = TestServer::new().await;
    let (status, _) = test.rest_raw("GET", "/email/list", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_create_is_400() {
    let test = TestServer::new().await;
    let body = json!({"email": "a@x.com"});

    let (status, _) = test.rest("POST", "/email/create", &body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = test.rest("POST", "/email/create", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("constraint"));
}

#[tokio::test]
async fn test_create_without_email_is_400() {
    let test = TestServer::new().await;

    let (status, error) = test.rest("POST", "/email/create", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({"error": "email is required"}));
}

#[tokio::test]
async fn test_update_without_email_is_400() {
    let test = TestServer::new().await;
    assert!(is_ok(&test.rpc(create("a@x.com")).await));

    for body in [
        json!({"confirmed_at": 5, "opt_out": true}),
        json!({"email": "", "confirmed_at": 5, "opt_out": true}),
    ] {
        let (status, error) = test.rest("PUT", "/email/update", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error, json!({"error": "email is required"}));
    }

    // The existing entry is untouched.
    let (_, entry) = test
        .rest("GET", "/email/get", &json!({"email": "a@x.com"}))
        .await;
    assert_eq!(entry["confirmed_at"], 0);
    assert_eq!(entry["opt_out"], false);
}

#[tokio::test]
async fn test_update_missing_is_400() {
    let test = TestServer::new().await;

    let (status, error) = test
        .rest(
            "PUT",
            "/email/update",
            &json!({"email": "nobody@x.com", "confirmed_at": 5, "opt_out": true}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({"error": "email not found: nobody@x.com"}));
}

#[tokio::test]
async fn test_delete_missing_is_400() {
    let test = TestServer::new().await;

    let (status, error) = test
        .rest("POST", "/email/delete", &json!({"email": "nobody@x.com"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({"error": "email not found: nobody@x.com"}));
}

#[tokio::test]
async fn test_bad_pagination_is_500_and_stops() {
    let test = TestServer::new().await;
    assert!(is_ok(&test.rpc(create("a@x.com")).await));

    for body in [
        json!({"page": 0, "count": 10}),
        json!({"page": 1, "count": 0}),
        json!({"page": -2, "count": 5}),
        json!({}),
    ] {
        let (status, reply) = test.rest("GET", "/email/get/batch", &body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{body}");
        // An error body only, never a page of entries.
        assert!(reply["error"].is_string(), "{reply}");
    }
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let test = TestServer::new().await;

    let (status, body) = test.rest_raw("POST", "/email/create", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("invalid JSON body"));

    let (status, _) = test
        .rest_raw("GET", "/email/get/batch", r#"{"page": "one"}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_body_lookup_is_null() {
    let test = TestServer::new().await;

    let (status, body) = test.rest_raw("GET", "/email/get", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "null");
}

#[tokio::test]
async fn test_unknown_fields_are_ignored() {
    let test = TestServer::new().await;

    let (status, created) = test
        .rest(
            "POST",
            "/email/create",
            &json!({"email": "a@x.com", "id": 77, "confirmed_at": 5, "opt_out": true, "extra": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    // Create ignores everything but the address.
    assert_ne!(created["id"], 77);
    assert_eq!(created["confirmed_at"], 0);
    assert_eq!(created["opt_out"], false);
}

#[tokio::test]
async fn test_store_failure_on_read_is_500() {
    let test = TestServer::new().await;
    test.store.close().await;

    let (status, _) = test
        .rest("GET", "/email/get", &json!({"email": "a@x.com"}))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = test
        .rest("GET", "/email/get/batch", &json!({"page": 1, "count": 1}))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = test
        .rest("POST", "/email/create", &json!({"email": "a@x.com"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
