use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::{
    config::LookupTarget,
    country_index::CountryNameIndex,
    domain::{
        errors::LookupError,
        models::{ClientRequestInfo, GeoLookupResult, GeoReport},
        ports::{geo_database::GeoDatabase, reverse_dns::ReverseDns},
    },
};

pub const HOSTNAME_UNRESOLVED: &str = "Unable to resolve hostname";

pub struct GeoReportService<D: ReverseDns, G: GeoDatabase> {
    dns: D,
    geo: G,
    countries: Arc<CountryNameIndex>,
    lookup_target: LookupTarget,
}

impl<D: ReverseDns, G: GeoDatabase> GeoReportService<D, G> {
    pub fn new(
        dns: D,
        geo: G,
        countries: Arc<CountryNameIndex>,
        lookup_target: LookupTarget,
    ) -> Self {
        Self {
            dns,
            geo,
            countries,
            lookup_target,
        }
    }

    /// Never fails: any resolution error becomes [`HOSTNAME_UNRESOLVED`].
    pub async fn resolve_hostname(&self, ip: &str) -> String {
        let resolved = match ip.parse() {
            Ok(addr) => self.dns.reverse_lookup(addr).await,
            Err(e) => Err(e.into()),
        };
        resolved.unwrap_or_else(|e| {
            tracing::warn!("Failed to resolve hostname for {}: {}", ip, e);
            HOSTNAME_UNRESOLVED.to_string()
        })
    }

    pub async fn look_up_location(&self, client_ip: &str) -> Result<GeoLookupResult, LookupError> {
        let ip = match self.lookup_target {
            LookupTarget::Fixed(ip) => ip,
            LookupTarget::Client => client_ip.trim().parse()?,
        };
        self.geo.look_up(ip).await
    }

    pub fn country_code_for_name(&self, name: Option<&str>) -> &'static str {
        self.countries.country_code_for_name(name)
    }

    pub async fn build_report(
        &self,
        user_agent: Option<String>,
        client_ip: String,
        requested_at: DateTime<Local>,
    ) -> GeoReport {
        let client_hostname = self.resolve_hostname(&client_ip).await;

        let location = self.look_up_location(&client_ip).await;
        match &location {
            Ok(found) => tracing::debug!(?found, "geolocation lookup succeeded"),
            Err(e) => tracing::error!("Geolocation lookup failed: {}", e),
        }

        let country_name = location
            .as_ref()
            .ok()
            .and_then(|found| found.country_name.as_deref());
        let country_code = self.country_code_for_name(country_name).to_string();

        GeoReport {
            client: ClientRequestInfo {
                user_agent,
                requested_at,
                client_ip,
                client_hostname,
            },
            location,
            country_code,
        }
    }
}
