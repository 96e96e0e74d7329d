use std::{net::IpAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use config::{Environment, File};
use serde::Deserialize;

const SERVER_PORT_KEY: &str = "server_port";

const GEOIP_DB_PATH_KEY: &str = "geoip_db_path";

const GEOIP_LOOKUP_TARGET_KEY: &str = "geoip_lookup_target";

const DNS_TIMEOUT_MS_KEY: &str = "dns_timeout_ms";

pub const DEFAULT_DB_PATH: &str = "data/GeoLite2-City.mmdb";

/// The address the report has always been generated for.
pub const DEFAULT_LOOKUP_IP: &str = "182.71.67.18";

/// Which address the geolocation query is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTarget {
    Fixed(IpAddr),
    Client,
}

impl FromStr for LookupTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("client") {
            return Ok(LookupTarget::Client);
        }
        s.parse::<IpAddr>()
            .map(LookupTarget::Fixed)
            .with_context(|| format!("invalid lookup target {:?}", s))
    }
}

impl Default for LookupTarget {
    fn default() -> Self {
        LookupTarget::Fixed(IpAddr::from([182, 71, 67, 18]))
    }
}

#[derive(Deserialize)]
struct RawConfig {
    server_port: String,
    geoip_db_path: String,
    geoip_lookup_target: String,
    dns_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: u16,
    pub geoip_db_path: PathBuf,
    pub lookup_target: LookupTarget,
    pub dns_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        dotenv::dotenv().ok();

        let raw: RawConfig = config::Config::builder()
            .set_default(SERVER_PORT_KEY, "3000")?
            .set_default(GEOIP_DB_PATH_KEY, DEFAULT_DB_PATH)?
            .set_default(GEOIP_LOOKUP_TARGET_KEY, DEFAULT_LOOKUP_IP)?
            .set_default(DNS_TIMEOUT_MS_KEY, 2000)?
            .add_source(File::with_name("config.toml").required(false))
            .add_source(Environment::default())
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        raw.try_into()
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = anyhow::Error;

    fn try_from(raw: RawConfig) -> anyhow::Result<Self> {
        let server_port = raw
            .server_port
            .trim()
            .parse::<u16>()
            .with_context(|| format!("Failed to parse server port {:?}", raw.server_port))?;

        let lookup_target = raw
            .geoip_lookup_target
            .parse()
            .context("Failed to get geoip lookup target")?;

        Ok(Config {
            server_port,
            geoip_db_path: PathBuf::from(raw.geoip_db_path),
            lookup_target,
            dns_timeout: Duration::from_millis(raw.dns_timeout_ms),
        })
    }
}
