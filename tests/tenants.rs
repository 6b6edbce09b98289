mod common;

use anyhow::Result;
use common::ids;
use reqwest::StatusCode;

#[tokio::test]
async fn tenant_profile_with_favorites() -> Result<()> {
    let server = common::start_server().await?;

    let (status, body) = server.get_json("/tenants/ten-carol").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cognitoId"], "ten-carol");
    assert_eq!(ids(&body["favorites"]), vec![1, 3]);

    let (status, _) = server.get_json("/tenants/ten-nobody").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn register_and_update_tenant() -> Result<()> {
    let server = common::start_server().await?;

    let res = server
        .client
        .post(server.url("/tenants"))
        .json(&serde_json::json!({
            "cognitoId": "ten-erin",
            "name": "Erin Walsh",
            "email": "erin@rentavenue.test",
            "phoneNumber": "+1-503-555-0105"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = server
        .client
        .put(server.url("/tenants/ten-erin"))
        .json(&serde_json::json!({
            "name": "Erin Walsh-Park",
            "email": "erin@rentavenue.test",
            "phoneNumber": "+1-503-555-0105"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "Erin Walsh-Park");

    let res = server
        .client
        .post(server.url("/tenants"))
        .json(&serde_json::json!({
            "cognitoId": "ten-erin",
            "name": "Erin again",
            "email": "erin@rentavenue.test",
            "phoneNumber": "+1-503-555-0105"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn favorites_add_and_remove() -> Result<()> {
    let server = common::start_server().await?;

    let res = server.client.post(server.url("/tenants/ten-dave/favorites/5")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(ids(&body["favorites"]), vec![5]);

    let res = server.client.post(server.url("/tenants/ten-dave/favorites/5")).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = server.client.delete(server.url("/tenants/ten-dave/favorites/5")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(ids(&body["favorites"]).is_empty());

    Ok(())
}

#[tokio::test]
async fn current_residences_and_manager_properties() -> Result<()> {
    let server = common::start_server().await?;

    let (status, body) = server.get_json("/tenants/ten-carol/current-residences").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2]);

    let (status, body) = server.get_json("/managers/mgr-bob/properties").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 4]);

    let (status, _) = server.get_json("/managers/mgr-nobody/properties").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}
