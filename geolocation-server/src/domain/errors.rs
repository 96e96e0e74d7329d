use std::net::{AddrParseError, IpAddr};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid IP address {0}")]
    InvalidAddress(#[from] AddrParseError),
    #[error("Reverse DNS error: {0}")]
    Resolve(#[from] hickory_resolver::error::ResolveError),
    #[error("No PTR record for {0}")]
    NoHostname(IpAddr),
    #[error("Reverse DNS timed out after {0} ms")]
    Timeout(u64),
}

/// Why a geolocation query produced no location block.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Failed to open DB: {0}")]
    DatabaseOpen(String),
    #[error("Invalid IP: {0}")]
    InvalidAddress(#[from] AddrParseError),
    #[error("No data found for IP {0}")]
    NotFound(IpAddr),
    #[error("Lookup failed: {0}")]
    Query(String),
}

impl LookupError {
    /// Diagnostic line rendered in place of the location block.
    pub fn report_line(&self) -> &'static str {
        match self {
            LookupError::DatabaseOpen(_) => {
                "Error: Unable to access the IP database or resolve client IP."
            }
            _ => "Error: Unable to fetch geolocation details.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_open_failure_uses_access_line() {
        let err = LookupError::DatabaseOpen("No such file or directory".into());
        assert_eq!(
            err.report_line(),
            "Error: Unable to access the IP database or resolve client IP."
        );
    }

    #[test]
    fn query_failures_use_fetch_line() {
        let not_found = LookupError::NotFound("10.0.0.1".parse().unwrap());
        let invalid = LookupError::from("not-an-ip".parse::<IpAddr>().unwrap_err());
        for err in [not_found, invalid, LookupError::Query("decode".into())] {
            assert_eq!(
                err.report_line(),
                "Error: Unable to fetch geolocation details."
            );
        }
    }
}
