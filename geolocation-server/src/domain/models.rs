use std::fmt;

use chrono::{DateTime, Local};

use super::errors::LookupError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    Ok,
    Failed,
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStatus::Ok => f.write_str("OK"),
            LookupStatus::Failed => f.write_str("FAILED"),
        }
    }
}

/// Location fields returned by one successful database query.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLookupResult {
    pub status: LookupStatus,
    pub country_name: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub isp: Option<String>,
    pub domain: Option<String>,
    pub net_speed: Option<String>,
}

impl Default for GeoLookupResult {
    fn default() -> Self {
        Self {
            status: LookupStatus::Ok,
            country_name: None,
            region: None,
            city: None,
            latitude: None,
            longitude: None,
            isp: None,
            domain: None,
            net_speed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientRequestInfo {
    pub user_agent: Option<String>,
    pub requested_at: DateTime<Local>,
    pub client_ip: String,
    pub client_hostname: String,
}

/// Plain-text report returned by `/ip/getiplocation`.
#[derive(Debug)]
pub struct GeoReport {
    pub client: ClientRequestInfo,
    pub location: Result<GeoLookupResult, LookupError>,
    pub country_code: String,
}

impl GeoReport {
    pub fn status(&self) -> LookupStatus {
        match &self.location {
            Ok(found) => found.status,
            Err(_) => LookupStatus::Failed,
        }
    }
}

fn or_na<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl fmt::Display for GeoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let client = &self.client;
        writeln!(f, "User Agent: {}", or_na(&client.user_agent))?;
        writeln!(
            f,
            "Date & Time: {}",
            client.requested_at.format(TIMESTAMP_FORMAT)
        )?;
        writeln!(f, "Client IP Address: {}", client.client_ip)?;
        writeln!(f, "Client Hostname: {}", client.client_hostname)?;

        match &self.location {
            Ok(location) => {
                writeln!(f, "Country: {}", or_na(&location.country_name))?;
                writeln!(f, "Region: {}", or_na(&location.region))?;
                writeln!(f, "City: {}", or_na(&location.city))?;
                writeln!(f, "Latitude: {}", or_na(&location.latitude))?;
                writeln!(f, "Longitude: {}", or_na(&location.longitude))?;
                writeln!(f, "ISP: {}", or_na(&location.isp))?;
                writeln!(f, "Domain: {}", or_na(&location.domain))?;
                writeln!(f, "Net Speed: {}", or_na(&location.net_speed))?;
                writeln!(f, "Status: {}", location.status)?;
            }
            Err(e) => writeln!(f, "{}", e.report_line())?,
        }

        writeln!(f, "Country Code: {}", self.country_code)
    }
}
