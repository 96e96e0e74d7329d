use std::future::Future;
use std::net::IpAddr;

use crate::domain::{errors::LookupError, models::GeoLookupResult};

pub trait GeoDatabase: Send + Sync + 'static {
    /// Opens the database, queries `ip`, and releases the handle before returning.
    fn look_up(
        &self,
        ip: IpAddr,
    ) -> impl Future<Output = Result<GeoLookupResult, LookupError>> + Send;
}
