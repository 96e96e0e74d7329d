use std::sync::Arc;

use application::services::geo_report_service::GeoReportService;
use country_index::CountryNameIndex;
use infrastructure::{
    dns::hickory_reverse_dns::HickoryReverseDns, geo::maxmind_database::MaxmindGeoDatabase,
};

pub mod adapters;
pub mod application;
pub mod config;
pub mod country_index;
pub mod domain;
pub mod infrastructure;
#[cfg(test)]
mod test_helpers;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = config::Config::from_env().expect("Failed to load configuration");

    let countries = Arc::new(CountryNameIndex::new());
    tracing::info!("Loaded {} country names", countries.len());

    let geo = MaxmindGeoDatabase::new(config.geoip_db_path.clone());
    if !geo.path().exists() {
        tracing::warn!(
            "GeoIP database {} not found, lookups will report an access error",
            geo.path().display()
        );
    }

    let dns = HickoryReverseDns::from_system_conf(config.dns_timeout);
    let report_service = GeoReportService::new(dns, geo, countries, config.lookup_target);
    tracing::info!(lookup_target = ?config.lookup_target, "geolocation lookup target");

    let http_config = adapters::http::HttpServerConfig {
        port: config.server_port,
    };
    let state = adapters::app_state::AppState::new(report_service);
    let http_server = adapters::http::HttpServer::new(http_config, state)
        .await
        .expect("Failed to create HTTP server");
    http_server.run().await.expect("Failed to run HTTP server");
}
