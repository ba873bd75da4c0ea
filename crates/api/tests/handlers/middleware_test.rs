use axum::http::StatusCode;
use chrono::Utc;
use parkspot_api::middleware::error_handling::map_error;
use parkspot_core::errors::ParkError;
use rstest::rstest;

use crate::test_utils::TestContext;

#[rstest]
#[case::not_found(ParkError::NotFound("slot".to_string()), StatusCode::NOT_FOUND)]
#[case::duplicate(ParkError::DuplicateSlotNumber(3), StatusCode::CONFLICT)]
#[case::unavailable(ParkError::SlotUnavailable("taken".to_string()), StatusCode::CONFLICT)]
#[case::window(ParkError::InvalidWindow { from: Utc::now(), till: Utc::now() }, StatusCode::BAD_REQUEST)]
#[case::validation(ParkError::Validation("bad".to_string()), StatusCode::BAD_REQUEST)]
#[case::authentication(ParkError::Authentication("who".to_string()), StatusCode::UNAUTHORIZED)]
#[case::store(ParkError::StoreUnavailable(eyre::eyre!("down")), StatusCode::SERVICE_UNAVAILABLE)]
#[case::internal(ParkError::Internal("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: ParkError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "status": "ok" }));

    let response = ctx.server.get("/version").await;
    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["name"], "parkspot-api");
}
