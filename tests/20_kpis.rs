mod common;

use anyhow::Result;
use reqwest::StatusCode;

use common::{booking, TestServer};

async fn server_with_bookings() -> Result<(TestServer, String)> {
    let server = TestServer::start().await?;
    server
        .install_rows(vec![
            booking("C101", "Airbnb", "2025-03-01 15:00", "2025-03-03 11:00", 2.0, 200.0, 40.0, 50.0),
            booking("B202", "Booking.com", "2025-03-15 14:00", "2025-03-18 10:00", 3.0, 300.0, 60.0, 70.0),
            booking("G303", "Airbnb", "2025-04-10 15:00", "2025-04-12 11:00", 2.0, 900.0, 90.0, 80.0),
            booking("B404", "Direct", "2025-03-30 15:00", "2025-04-02 11:00", 3.0, 330.0, 30.0, 40.0),
        ])
        .await?;
    let token = server.register("viewer@example.com", "secret").await?;
    Ok((server, token))
}

#[tokio::test]
async fn kpis_for_march() -> Result<()> {
    let (server, token) = server_with_bookings().await?;
    let (status, body) = server
        .get("/api/kpis?start_date=2025-03-01&end_date=2025-03-29", &token)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let kpis = &body["data"];
    assert_eq!(kpis["totalReservas"], 2);
    assert_eq!(kpis["checkIns"], 2);
    assert_eq!(kpis["checkOuts"], 2);
    assert_eq!(kpis["totalFaturado"], 500.0);
    assert_eq!(kpis["ticketMedio"], 100.0);
    assert_eq!(kpis["comissaoEmpresa"], 100.0);
    assert_eq!(kpis["totalTaxaLimpeza"], 120.0);
    assert_eq!(kpis["comissaoGonzagaCalculada"], 40.0);
    assert_eq!(kpis["unidadesAtivas"], 137);
    assert!(kpis["taxaOcupacao"].as_f64().is_some());
    assert_eq!(kpis.as_object().map(|o| o.len()), Some(10));
    Ok(())
}

#[tokio::test]
async fn check_in_inside_check_out_outside() -> Result<()> {
    let (server, token) = server_with_bookings().await?;
    let (_, body) = server
        .get("/api/kpis?start_date=2025-03-30&end_date=2025-03-31", &token)
        .await?;
    assert_eq!(body["data"]["checkIns"], 1);
    assert_eq!(body["data"]["checkOuts"], 0);
    Ok(())
}

#[tokio::test]
async fn region_and_channel_filters() -> Result<()> {
    let (server, token) = server_with_bookings().await?;
    let range = "start_date=2025-03-01&end_date=2025-04-30";

    let (_, body) = server.get(&format!("/api/kpis?{}&region=Region%20A", range), &token).await?;
    assert_eq!(body["data"]["totalReservas"], 2);

    let (_, body) = server.get(&format!("/api/kpis?{}&state_filter=Region%20B", range), &token).await?;
    assert_eq!(body["data"]["totalReservas"], 2);

    let (_, body) = server.get(&format!("/api/kpis?{}&channel=Airbnb", range), &token).await?;
    assert_eq!(body["data"]["totalReservas"], 2);
    assert_eq!(body["data"]["totalFaturado"], 1100.0);

    let (_, all) = server.get(&format!("/api/kpis?{}&region=All&channel_filter=All", range), &token).await?;
    let (_, none) = server.get(&format!("/api/kpis?{}", range), &token).await?;
    assert_eq!(all["data"], none["data"]);
    assert_eq!(none["data"]["totalReservas"], 4);
    Ok(())
}

#[tokio::test]
async fn malformed_dates_are_bad_requests() -> Result<()> {
    let (server, token) = server_with_bookings().await?;
    for query in [
        "start_date=2025-13-01&end_date=2025-03-31",
        "start_date=01/03/2025",
        "start_date=2025-03-31&end_date=2025-03-01",
    ] {
        let (status, body) = server.get(&format!("/api/kpis?{}", query), &token).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
    Ok(())
}

#[tokio::test]
async fn missing_dataset_is_not_found() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.register("viewer@example.com", "secret").await?;

    let (status, body) = server.get("/api/kpis", &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = server.get("/api/channels", &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn channels_in_first_seen_order() -> Result<()> {
    let (server, token) = server_with_bookings().await?;
    let (status, body) = server.get("/api/channels", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], serde_json::json!(["Airbnb", "Booking.com", "Direct"]));
    Ok(())
}
