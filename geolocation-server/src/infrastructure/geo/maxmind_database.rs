use std::{
    collections::BTreeMap,
    net::IpAddr,
    path::{Path, PathBuf},
};

use maxminddb::{geoip2, Reader};
use serde::Deserialize;

use crate::domain::{
    errors::LookupError,
    models::{GeoLookupResult, LookupStatus},
    ports::geo_database::GeoDatabase,
};

/// ISP, domain and connection-type fields, found at the top level of the
/// dedicated databases or under `traits` in combined ones.
#[derive(Deserialize, Debug, Default)]
struct NetworkRecord<'a> {
    isp: Option<&'a str>,
    domain: Option<&'a str>,
    connection_type: Option<&'a str>,
    #[serde(borrow)]
    traits: Option<NetworkTraits<'a>>,
}

#[derive(Deserialize, Debug, Default)]
struct NetworkTraits<'a> {
    isp: Option<&'a str>,
    domain: Option<&'a str>,
    connection_type: Option<&'a str>,
}

impl<'a> NetworkRecord<'a> {
    fn field(
        top: Option<&'a str>,
        traits: &Option<NetworkTraits<'a>>,
        pick: fn(&NetworkTraits<'a>) -> Option<&'a str>,
    ) -> Option<String> {
        top.or_else(|| traits.as_ref().and_then(pick))
            .map(str::to_owned)
    }
}

/// Reads a MaxMind DB file. The file is memory-mapped for every lookup and
/// the mapping is dropped before the lookup returns.
pub struct MaxmindGeoDatabase {
    path: PathBuf,
}

impl MaxmindGeoDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn english(names: &Option<BTreeMap<&str, &str>>) -> Option<String> {
    names
        .as_ref()
        .and_then(|names| names.get("en"))
        .map(|name| name.to_string())
}

fn query(path: &Path, ip: IpAddr) -> Result<GeoLookupResult, LookupError> {
    let reader = Reader::open_mmap(path)
        .map_err(|e| LookupError::DatabaseOpen(e.to_string()))?;

    let city: geoip2::City = reader
        .lookup(ip)
        .map_err(|e| LookupError::Query(e.to_string()))?
        .ok_or(LookupError::NotFound(ip))?;

    let network: NetworkRecord = reader
        .lookup(ip)
        .map_err(|e| LookupError::Query(e.to_string()))?
        .unwrap_or_default();

    let country_name = city.country.as_ref().and_then(|c| english(&c.names));

    let region = city
        .subdivisions
        .as_ref()
        .and_then(|subs| subs.first())
        .and_then(|sub| english(&sub.names));

    let city_name = city.city.as_ref().and_then(|c| english(&c.names));

    let location = city.location.as_ref();

    Ok(GeoLookupResult {
        status: LookupStatus::Ok,
        country_name,
        region,
        city: city_name,
        latitude: location.and_then(|l| l.latitude),
        longitude: location.and_then(|l| l.longitude),
        isp: NetworkRecord::field(network.isp, &network.traits, |t| t.isp),
        domain: NetworkRecord::field(network.domain, &network.traits, |t| t.domain),
        net_speed: NetworkRecord::field(network.connection_type, &network.traits, |t| {
            t.connection_type
        }),
    })
}

impl GeoDatabase for MaxmindGeoDatabase {
    async fn look_up(&self, ip: IpAddr) -> Result<GeoLookupResult, LookupError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || query(&path, ip))
            .await
            .map_err(|e| LookupError::Query(e.to_string()))?
    }
}
