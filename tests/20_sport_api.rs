mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn sport_lifecycle() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let code = common::unique_code(3);

    // Create
    let res = client
        .post(server.url("/api/Sport"))
        .header("x-user-name", "coordinator")
        .json(&json!({ "code": code, "name": "Lifecycle" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("location header");
    let created = res.json::<Value>().await?;
    let id = common::id_of(&created);
    assert_eq!(location, format!("/api/Sport/{}", id));
    assert_eq!(created["rowVersion"], 1);
    assert_eq!(created["createdBy"], "coordinator");
    assert!(created.get("athletes").is_none(), "plain reads carry no children: {}", created);

    // Read back
    let fetched = client.get(server.url(&location)).send().await?;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = fetched.json::<Value>().await?;
    assert_eq!(fetched["code"], code);

    // Update with the current token
    let res = client
        .put(server.url(&location))
        .header("x-user-name", "editor")
        .json(&json!({ "id": id, "code": code, "name": "Renamed", "rowVersion": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let updated = client.get(server.url(&location)).send().await?.json::<Value>().await?;
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["rowVersion"], 2);
    assert_eq!(updated["updatedBy"], "editor");
    assert_eq!(updated["createdBy"], "coordinator");

    // Delete
    let res = client.delete(server.url(&location)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client.get(server.url(&location)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn stale_row_version_is_conflict() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let sport = common::create_sport(&client, server).await?;
    let id = common::id_of(&sport);
    let code = sport["code"].clone();
    let url = server.url(&format!("/api/Sport/{}", id));

    let first = client
        .put(&url)
        .json(&json!({ "id": id, "code": code, "name": "First", "rowVersion": 1 }))
        .send()
        .await?;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = client
        .put(&url)
        .json(&json!({ "id": id, "code": code, "name": "Second", "rowVersion": 1 }))
        .send()
        .await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = second.json::<Value>().await?;
    assert!(
        body["message"].as_str().unwrap_or_default().contains("updated by another user"),
        "unexpected body: {}",
        body
    );

    let current = client.get(&url).send().await?.json::<Value>().await?;
    assert_eq!(current["name"], "First");

    Ok(())
}

#[tokio::test]
async fn updating_removed_sport_is_conflict() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let sport = common::create_sport(&client, server).await?;
    let id = common::id_of(&sport);
    let url = server.url(&format!("/api/Sport/{}", id));

    assert_eq!(client.delete(&url).send().await?.status(), StatusCode::NO_CONTENT);

    let res = client
        .put(&url)
        .json(&json!({ "id": id, "code": sport["code"], "name": "Ghost", "rowVersion": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Concurrency Error: Sport has been Removed.");

    Ok(())
}

#[tokio::test]
async fn mismatched_body_id_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let sport = common::create_sport(&client, server).await?;
    let id = common::id_of(&sport);

    let res = client
        .put(server.url(&format!("/api/Sport/{}", id)))
        .json(&json!({ "id": id + 1000, "code": sport["code"], "name": "Other", "rowVersion": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Error: ID does not match Sport");

    Ok(())
}

#[tokio::test]
async fn duplicate_code_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let sport = common::create_sport(&client, server).await?;

    let res = client
        .post(server.url("/api/Sport"))
        .json(&json!({ "code": sport["code"], "name": "Copycat" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "DUPLICATE_CODE");
    assert_eq!(body["message"], "Unable to save: Duplicate Sport Code number.");

    Ok(())
}

#[tokio::test]
async fn invalid_sport_reports_field_errors() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/Sport"))
        .json(&json!({ "code": "TOOLONG" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"].get("code").is_some(), "unexpected body: {}", body);
    assert!(body["field_errors"].get("name").is_some(), "unexpected body: {}", body);

    Ok(())
}

#[tokio::test]
async fn sport_with_athletes_cannot_be_deleted() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let sport = common::create_sport(&client, server).await?;
    let contingent = common::create_contingent(&client, server).await?;
    let sport_id = common::id_of(&sport);
    let athlete = common::athlete_body(sport_id, common::id_of(&contingent));
    common::create(&client, server, "Athlete", athlete).await?;

    let res = client
        .delete(server.url(&format!("/api/Sport/{}", sport_id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "REFERENTIAL_INTEGRITY");
    assert_eq!(
        body["message"],
        "Delete Error: Remember, you cannot delete a Sport that has Athletes assigned."
    );

    // Still there, now listing its athlete
    let res = client
        .get(server.url(&format!("/api/Sport/inc/{}", sport_id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["athletes"].as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn deleting_missing_sport_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.delete(server.url("/api/Sport/999999")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Delete Error: Sport has already been removed.");

    Ok(())
}

#[tokio::test]
async fn list_is_ordered_by_name() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    for name in ["Zzz Last", "Aaa First"] {
        common::create(
            &client,
            server,
            "Sport",
            json!({ "code": common::unique_code(3), "name": name }),
        )
        .await?;
    }

    let sports = client.get(server.url("/api/Sport")).send().await?.json::<Vec<Value>>().await?;
    let names: Vec<&str> = sports.iter().filter_map(|s| s["name"].as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    Ok(())
}
