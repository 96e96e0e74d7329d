use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
};
use chrono::Local;

use super::{app_state::AppState, client_ip::resolve_client_ip};
use crate::domain::ports::{geo_database::GeoDatabase, reverse_dns::ReverseDns};

/// `GET /ip/getiplocation`. Always answers 200 with a plain-text report.
pub async fn get_ip_location<D: ReverseDns, G: GeoDatabase>(
    State(state): State<AppState<D, G>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let requested_at = Local::now();

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let client_ip = resolve_client_ip(&headers, peer.ip());
    tracing::info!(%client_ip, "geolocation report requested");

    let report = state
        .report_service
        .build_report(user_agent, client_ip, requested_at)
        .await;

    tracing::debug!(status = %report.status(), country_code = %report.country_code, "report built");

    (StatusCode::OK, report.to_string())
}
