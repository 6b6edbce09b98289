mod common;

use anyhow::Result;
use reqwest::StatusCode;

fn app_ids(body: &serde_json::Value) -> Vec<i64> {
    common::ids(body)
}

#[tokio::test]
async fn applications_scoped_by_user() -> Result<()> {
    let server = common::start_server().await?;

    let (status, body) = server.get_json("/applications").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app_ids(&body), vec![1, 2, 3]);

    let (_, body) = server.get_json("/applications?userId=ten-carol&userType=tenant").await?;
    assert_eq!(app_ids(&body), vec![1, 3]);
    assert_eq!(body[0]["lease"]["id"], 1);
    assert!(body[0]["lease"]["nextPaymentDate"].is_string());
    assert!(body[1]["lease"].is_null());

    let (_, body) = server.get_json("/applications?userId=mgr-bob&userType=manager").await?;
    assert_eq!(app_ids(&body), vec![3]);
    assert_eq!(body[0]["property"]["address"], "1020 W Wellington Ave");

    let (status, _) = server.get_json("/applications?userId=x&userType=admin").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn approval_creates_lease() -> Result<()> {
    let server = common::start_server().await?;

    let res = server
        .client
        .put(server.url("/applications/2/status"))
        .json(&serde_json::json!({ "status": "Approved" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "Approved");
    let lease_id = body["leaseId"].as_i64().expect("approved application has a lease");

    let (_, leases) = server.get_json("/leases").await?;
    let lease = leases
        .as_array()
        .and_then(|all| all.iter().find(|l| l["id"].as_i64() == Some(lease_id)))
        .cloned()
        .expect("new lease is listed");
    assert_eq!(lease["propertyId"], 1);
    assert_eq!(lease["tenantCognitoId"], "ten-dave");

    let (status, payments) = server.get_json(&format!("/leases/{}/payments", lease_id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(payments.as_array().map(|p| p.is_empty()).unwrap_or(false));

    let (_, residences) = server.get_json("/tenants/ten-dave/current-residences").await?;
    assert_eq!(common::ids(&residences), vec![1, 3]);

    // Decided applications stay decided
    let res = server
        .client
        .put(server.url("/applications/2/status"))
        .json(&serde_json::json!({ "status": "Denied" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn submit_application() -> Result<()> {
    let server = common::start_server().await?;

    let res = server
        .client
        .post(server.url("/applications"))
        .json(&serde_json::json!({
            "propertyId": 5,
            "tenantCognitoId": "ten-dave",
            "name": "Dave Okafor",
            "email": "dave@rentavenue.test",
            "phoneNumber": "+1-718-555-0104",
            "message": "Is parking included?"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["id"], 4);

    let (status, _) = server.get_json("/leases/99/payments").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}
