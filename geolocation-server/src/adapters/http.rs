use std::net::SocketAddr;

use anyhow::Context;
use axum::{Router, http::StatusCode, routing::*};
use tokio::net;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{app_state::AppState, geo_location::get_ip_location};
use crate::domain::ports::{geo_database::GeoDatabase, reverse_dns::ReverseDns};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig {
    pub port: u16,
}

pub struct HttpServer {
    router: Router,
    listener: net::TcpListener,
}

impl HttpServer {
    pub async fn new<D: ReverseDns, G: GeoDatabase>(
        config: HttpServerConfig,
        state: AppState<D, G>,
    ) -> anyhow::Result<Self> {
        let router = router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], config.port));

        let listener = net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to listen on port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self
            .listener
            .local_addr()
            .context("failed to read listener address")?;
        tracing::debug!("listening on {}", addr);
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .context("received error from running server")?;
        Ok(())
    }
}

pub fn router<D: ReverseDns, G: GeoDatabase>(state: AppState<D, G>) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        });

    Router::new()
        .route("/health", get(health_route))
        .nest("/ip", ip_routes())
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn ip_routes<D: ReverseDns, G: GeoDatabase>() -> Router<AppState<D, G>> {
    Router::new().route("/getiplocation", get(get_ip_location::<D, G>))
}

async fn health_route() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        extract::connect_info::MockConnectInfo,
        http::{header, Request},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        application::services::geo_report_service::GeoReportService,
        config::LookupTarget,
        country_index::CountryNameIndex,
        infrastructure::geo::maxmind_database::MaxmindGeoDatabase,
        test_helpers::{india, StubDns, StubGeo, StubOutcome},
    };

    fn app<G: GeoDatabase>(dns: StubDns, geo: G) -> Router {
        let service = GeoReportService::new(
            dns,
            geo,
            Arc::new(CountryNameIndex::new()),
            LookupTarget::default(),
        );
        router(AppState::new(service))
            .layer(MockConnectInfo(SocketAddr::from(([203, 0, 113, 5], 51234))))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    fn report_request() -> axum::http::request::Builder {
        Request::builder()
            .uri("/ip/getiplocation")
            .header(header::USER_AGENT, "TestAgent")
    }

    #[tokio::test]
    async fn report_uses_peer_address_without_forwarding_headers() {
        let app = app(StubDns::failing(), StubGeo::new(StubOutcome::Found(india())));
        let (status, content_type, body) =
            send(app, report_request().body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/plain"));
        assert!(body.starts_with("User Agent: TestAgent\n"));
        assert!(body.contains("\nClient IP Address: 203.0.113.5\n"));
        assert!(body.contains("\nClient Hostname: Unable to resolve hostname\n"));
        assert!(body.ends_with("Country Code: IN\n"));
    }

    #[tokio::test]
    async fn report_lines_are_in_fixed_order() {
        let app = app(
            StubDns::resolving("edge.example.net"),
            StubGeo::new(StubOutcome::Found(india())),
        );
        let (_, _, body) = send(app, report_request().body(Body::empty()).unwrap()).await;

        let labels: Vec<&str> = body
            .lines()
            .map(|line| line.split_once(": ").unwrap().0)
            .collect();
        assert_eq!(
            labels,
            vec![
                "User Agent",
                "Date & Time",
                "Client IP Address",
                "Client Hostname",
                "Country",
                "Region",
                "City",
                "Latitude",
                "Longitude",
                "ISP",
                "Domain",
                "Net Speed",
                "Status",
                "Country Code",
            ]
        );
        assert!(body.contains("\nDomain: N/A\n"));
        assert!(body.contains("\nClient Hostname: edge.example.net\n"));
    }

    #[tokio::test]
    async fn timestamp_has_second_precision() {
        let app = app(StubDns::failing(), StubGeo::new(StubOutcome::NotFound));
        let (_, _, body) = send(app, report_request().body(Body::empty()).unwrap()).await;

        let stamp = body
            .lines()
            .find_map(|line| line.strip_prefix("Date & Time: "))
            .unwrap();
        assert!(
            chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok(),
            "{stamp}"
        );
    }

    #[tokio::test]
    async fn forwarded_header_overrides_peer() {
        let app = app(StubDns::failing(), StubGeo::new(StubOutcome::NotFound));
        let request = report_request()
            .header("x-forwarded-for", "1.2.3.4, 5.6.7.8")
            .body(Body::empty())
            .unwrap();
        let (_, _, body) = send(app, request).await;

        assert!(body.contains("\nClient IP Address: 1.2.3.4\n"));
    }

    #[tokio::test]
    async fn missing_database_still_answers_ok() {
        let app = app(
            StubDns::failing(),
            MaxmindGeoDatabase::new("does/not/exist/GeoLite2-City.mmdb"),
        );
        let (status, _, body) = send(app, report_request().body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(
            "\nError: Unable to access the IP database or resolve client IP.\n"
        ));
        assert!(!body.contains("\nCountry: "));
        assert!(body.ends_with("Country Code: Unknown\n"));
    }

    #[tokio::test]
    async fn client_target_reports_database_record() {
        let service = GeoReportService::new(
            StubDns::resolving("host.frpt.net"),
            MaxmindGeoDatabase::new(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/testdata/geo-enterprise-test.mmdb"
            )),
            Arc::new(CountryNameIndex::new()),
            LookupTarget::Client,
        );
        let app = router(AppState::new(service))
            .layer(MockConnectInfo(SocketAddr::from(([203, 0, 113, 5], 51234))));
        let request = report_request()
            .header("x-forwarded-for", "74.209.24.5")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        let lines: Vec<&str> = body.lines().skip(2).collect();
        assert_eq!(
            lines,
            vec![
                "Client IP Address: 74.209.24.5",
                "Client Hostname: host.frpt.net",
                "Country: United States",
                "Region: New York",
                "City: Chatham",
                "Latitude: 42.3478",
                "Longitude: -73.5549",
                "ISP: Fairpoint Communications",
                "Domain: frpt.net",
                "Net Speed: Cable/DSL",
                "Status: OK",
                "Country Code: US",
            ]
        );
    }

    #[tokio::test]
    async fn missing_user_agent_renders_na() {
        let app = app(StubDns::failing(), StubGeo::new(StubOutcome::Unopenable));
        let request = Request::builder()
            .uri("/ip/getiplocation")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("User Agent: N/A\n"));
    }

    #[tokio::test]
    async fn health_route_answers_ok() {
        let app = app(StubDns::failing(), StubGeo::new(StubOutcome::NotFound));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }
}
