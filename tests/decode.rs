//! VIN lookup against a local stand-in for the vPIC service.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use dreamcar::build_cmd::{run_build, BuildArgs};
use dreamcar::config::{Config, VinConfig};
use dreamcar::decode::{LookupError, VinLookup};
use dreamcar::stats::open_tracker;
use serde_json::json;
use tempfile::TempDir;

const ACCORD: &str = "1HGCM82633A004352";

async fn decode_vin(Path(vin): Path<String>) -> Response {
    match vin.as_str() {
        ACCORD => Json(json!({
            "Count": 6,
            "Message": "Results returned successfully",
            "Results": [
                { "Variable": "Make", "Value": "HONDA" },
                { "Variable": "Model", "Value": "Accord" },
                { "Variable": "Model Year", "Value": "2003" },
                { "Variable": "Body Class", "Value": "Coupe" },
                { "Variable": "Trim", "Value": "EX-V6" },
                { "Variable": "Displacement (L)", "Value": "3.0" },
                { "Variable": "Plant Country", "Value": "Not Applicable" },
                { "Variable": "Series", "Value": null }
            ]
        }))
        .into_response(),
        "SERVERFAILURE0000" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "NOTJSON0000000000" => "<html>maintenance</html>".into_response(),
        _ => Json(json!({
            "Count": 0,
            "Message": "Some error occurred while decoding",
            "Results": []
        }))
        .into_response(),
    }
}

async fn spawn_lookup_service() -> String {
    let app = Router::new().route("/api/vehicles/DecodeVin/{vin}", get(decode_vin));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/vehicles", addr)
}

fn lookup(api_base: &str) -> VinLookup {
    VinLookup::new(&VinConfig {
        api_base: api_base.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_decode_maps_record() {
    let base = spawn_lookup_service().await;
    let record = lookup(&base).decode(ACCORD).await.unwrap();

    assert_eq!(record.make.as_deref(), Some("HONDA"));
    assert_eq!(record.year.as_deref(), Some("2003"));
    assert_eq!(record.body_style.as_deref(), Some("Coupe"));
    assert_eq!(record.plant_country, None);
    assert_eq!(record.series, None);
    assert_eq!(record.display_name(), "2003 HONDA Accord EX-V6");
    assert!(record
        .detail_rows()
        .contains(&("Engine Size", "3.0L".to_string())));
}

#[tokio::test]
async fn test_server_error_is_network() {
    let base = spawn_lookup_service().await;
    let err = lookup(&base).decode("SERVERFAILURE0000").await.unwrap_err();
    assert!(err.is_network(), "{:?}", err);
}

#[tokio::test]
async fn test_error_message_is_decode() {
    let base = spawn_lookup_service().await;
    let err = lookup(&base).decode("ANYTHINGELSE00000").await.unwrap_err();
    assert!(matches!(err, LookupError::Decode(_)));
    assert!(err.to_string().starts_with("Invalid VIN or API error"));
}

#[tokio::test]
async fn test_non_json_body_is_decode() {
    let base = spawn_lookup_service().await;
    let err = lookup(&base).decode("NOTJSON0000000000").await.unwrap_err();
    assert!(matches!(err, LookupError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_network() {
    // bind then drop to get a port nobody is listening on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = lookup(&format!("http://{}", addr))
        .decode(ACCORD)
        .await
        .unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_build_from_vin() {
    let base = spawn_lookup_service().await;
    let tmp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.vin.api_base = base;
    config.counters.path = tmp.path().join("counters.json");

    run_build(
        &config,
        &BuildArgs {
            vin: Some(ACCORD.to_lowercase()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // the initial step-1 render shows the torque wrench set; once the
    // Accord's make, model, and body style become keywords nothing matches
    assert_eq!(open_tracker(&config).counters().impressions, 1);
}
