//! Create, list, confirm, read, delete: one address through its whole life.

use serde_json::json;

use crate::e2e_tests::helpers::*;
use crate::proto::google::rpc::Code;

#[tokio::test]
async fn test_lifecycle_over_rpc() {
    let test = TestServer::new().await;

    let created = test.rpc(create("a@x.com")).await;
    assert!(is_ok(&created));
    let created_entry = entry(&created).unwrap().clone();
    assert_eq!(created_entry.email, "a@x.com");
    assert_eq!(created_entry.confirmed_at, 0);
    assert!(!created_entry.opt_out);

    let page = test.rpc(batch(1, 10)).await;
    assert!(is_ok(&page));
    assert_eq!(entries(&page).len(), 1);
    assert_eq!(entries(&page)[0].email, "a@x.com");
    assert!(!entries(&page)[0].opt_out);

    let updated = test.rpc(update("a@x.com", 10_000, true)).await;
    assert!(is_ok(&updated));

    let fetched = test.rpc(get("a@x.com")).await;
    let fetched_entry = entry(&fetched).unwrap();
    assert_eq!(fetched_entry.confirmed_at, 10_000);
    assert!(fetched_entry.opt_out);
    assert_eq!(fetched_entry.id, created_entry.id);

    let deleted = test.rpc(delete("a@x.com")).await;
    assert!(is_ok(&deleted));
    assert_eq!(entry(&deleted), None);

    let missing = test.rpc(get("a@x.com")).await;
    assert!(is_ok(&missing));
    assert_eq!(entry(&missing), None);

    let page = test.rpc(batch(1, 10)).await;
    assert!(entries(&page).is_empty());

    let again = test.rpc(delete("a@x.com")).await;
    assert_eq!(code(&again), Code::NotFound);
}

#[tokio::test]
async fn test_lifecycle_over_rest() {
    let test = TestServer::new().await;

    let (status, created) = test
        .rest("POST", "/email/create", &json!({"email": "a@x.com"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(created["email"], "a@x.com");
    assert_eq!(created["confirmed_at"], 0);
    assert_eq!(created["opt_out"], false);

    let (status, page) = test
        .rest("GET", "/email/get/batch", &json!({"page": 1, "count": 10}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["email"], "a@x.com");
    assert_eq!(page[0]["opt_out"], false);

    let (status, updated) = test
        .rest(
            "PUT",
            "/email/update",
            &json!({"email": "a@x.com", "confirmed_at": 10_000, "opt_out": true}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["confirmed_at"], 10_000);

    let (status, fetched) = test
        .rest("GET", "/email/get", &json!({"email": "a@x.com"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(fetched["confirmed_at"], 10_000);
    assert_eq!(fetched["opt_out"], true);
    assert_eq!(fetched["id"], created["id"]);

    let (status, deleted) = test
        .rest("POST", "/email/delete", &json!({"email": "a@x.com"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(deleted, serde_json::Value::Null);

    let (status, missing) = test
        .rest("GET", "/email/get", &json!({"email": "a@x.com"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(missing, serde_json::Value::Null);

    let (status, page) = test
        .rest("GET", "/email/get/batch", &json!({"page": 1, "count": 10}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(page, json!([]));
}
