mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn parents(client: &reqwest::Client, server: &common::TestServer) -> Result<(i64, i64)> {
    let sport = common::create_sport(client, server).await?;
    let contingent = common::create_contingent(client, server).await?;
    Ok((common::id_of(&sport), common::id_of(&contingent)))
}

#[tokio::test]
async fn athlete_lifecycle() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (sport_id, contingent_id) = parents(&client, server).await?;

    let mut body = common::athlete_body(sport_id, contingent_id);
    let created = common::create(&client, server, "Athlete", body.clone()).await?;
    let id = common::id_of(&created);
    assert_eq!(created["sportID"], sport_id);
    assert_eq!(created["contingentID"], contingent_id);
    assert_eq!(created["dob"], "2004-06-15");
    assert_eq!(created["createdBy"], "Unknown");
    assert!(created.get("sport").is_none());

    // inc carries both parents
    let inc = client
        .get(server.url(&format!("/api/Athlete/inc/{}", id)))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(inc["sport"]["id"], sport_id);
    assert_eq!(inc["contingent"]["id"], contingent_id);

    // Update
    body["id"] = json!(id);
    body["rowVersion"] = json!(1);
    body["weight"] = json!(70.25);
    let res = client
        .put(server.url(&format!("/api/Athlete/{}", id)))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let fetched = client
        .get(server.url(&format!("/api/Athlete/{}", id)))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(fetched["weight"], 70.25);
    assert_eq!(fetched["rowVersion"], 2);

    // Replaying the old token loses
    let res = client
        .put(server.url(&format!("/api/Athlete/{}", id)))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .delete(server.url(&format!("/api/Athlete/{}", id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn missing_parent_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, contingent_id) = parents(&client, server).await?;

    let res = client
        .post(server.url("/api/Athlete"))
        .json(&common::athlete_body(999_999, contingent_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "MISSING_REFERENCE");
    assert!(body["field_errors"].get("sportID").is_some(), "unexpected body: {}", body);

    Ok(())
}

#[tokio::test]
async fn duplicate_athlete_code_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (sport_id, contingent_id) = parents(&client, server).await?;

    let first = common::athlete_body(sport_id, contingent_id);
    common::create(&client, server, "Athlete", first.clone()).await?;

    let res = client.post(server.url("/api/Athlete")).json(&first).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "DUPLICATE_CODE");
    assert!(body["field_errors"].get("athleteCode").is_some(), "unexpected body: {}", body);

    Ok(())
}

#[tokio::test]
async fn invalid_athlete_reports_each_field() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/Athlete"))
        .json(&json!({
            "firstName": "Sam",
            "lastName": "Lee",
            "athleteCode": "12345678",
            "dob": "not-a-date",
            "height": 0,
            "weight": 60.0,
            "affiliation": "Club",
            "mediaInfo": "Info",
            "gender": "MF",
            "sportID": 1,
            "contingentID": 1
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["athleteCode", "dob", "height", "gender"] {
        assert!(body["field_errors"].get(field).is_some(), "missing {} in {}", field, body);
    }

    Ok(())
}

#[tokio::test]
async fn list_is_ordered_by_last_then_first_name() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (sport_id, contingent_id) = parents(&client, server).await?;

    for (first, last) in [("Zoe", "Adams"), ("Amy", "Adams")] {
        let mut body = common::athlete_body(sport_id, contingent_id);
        body["firstName"] = json!(first);
        body["lastName"] = json!(last);
        common::create(&client, server, "Athlete", body).await?;
    }

    let athletes = client
        .get(server.url("/api/Athlete"))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    let adams: Vec<&str> = athletes
        .iter()
        .filter(|a| a["lastName"] == "Adams")
        .filter_map(|a| a["firstName"].as_str())
        .collect();
    let mut sorted = adams.clone();
    sorted.sort();
    assert_eq!(adams, sorted);

    Ok(())
}
