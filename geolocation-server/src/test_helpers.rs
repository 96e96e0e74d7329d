//! In-memory port implementations shared by the service and router tests.

use std::{net::IpAddr, sync::Mutex};

use crate::domain::{
    errors::{AppError, LookupError},
    models::GeoLookupResult,
    ports::{geo_database::GeoDatabase, reverse_dns::ReverseDns},
};

pub struct StubDns {
    pub hostname: Option<String>,
}

impl StubDns {
    pub fn resolving(hostname: &str) -> Self {
        Self {
            hostname: Some(hostname.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { hostname: None }
    }
}

impl ReverseDns for StubDns {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<String, AppError> {
        self.hostname.clone().ok_or(AppError::NoHostname(ip))
    }
}

pub enum StubOutcome {
    Found(GeoLookupResult),
    NotFound,
    Unopenable,
}

/// Answers every query with a fixed outcome and records the queried addresses.
pub struct StubGeo {
    outcome: StubOutcome,
    queried: Mutex<Vec<IpAddr>>,
}

impl StubGeo {
    pub fn new(outcome: StubOutcome) -> Self {
        Self {
            outcome,
            queried: Mutex::new(Vec::new()),
        }
    }

    pub fn queried(&self) -> Vec<IpAddr> {
        self.queried.lock().unwrap().clone()
    }
}

impl GeoDatabase for StubGeo {
    async fn look_up(&self, ip: IpAddr) -> Result<GeoLookupResult, LookupError> {
        self.queried.lock().unwrap().push(ip);
        match &self.outcome {
            StubOutcome::Found(result) => Ok(result.clone()),
            StubOutcome::NotFound => Err(LookupError::NotFound(ip)),
            StubOutcome::Unopenable => Err(LookupError::DatabaseOpen(
                "No such file or directory (os error 2)".into(),
            )),
        }
    }
}

pub fn india() -> GeoLookupResult {
    GeoLookupResult {
        country_name: Some("India".into()),
        region: Some("Delhi".into()),
        city: Some("New Delhi".into()),
        latitude: Some(28.6139),
        longitude: Some(77.209),
        isp: Some("Bharti Airtel".into()),
        domain: None,
        net_speed: None,
        ..Default::default()
    }
}
