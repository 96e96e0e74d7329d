use std::{net::IpAddr, time::Duration};

use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    error::ResolveErrorKind,
    system_conf::read_system_conf,
    TokioAsyncResolver,
};

use crate::domain::{errors::AppError, ports::reverse_dns::ReverseDns};

/// PTR lookups through hickory with a single attempt. `timeout` bounds the
/// whole lookup, independent of the per-query timeout in `opts`.
pub struct HickoryReverseDns {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl HickoryReverseDns {
    pub fn new(config: ResolverConfig, mut opts: ResolverOpts, timeout: Duration) -> Self {
        opts.attempts = 1;
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            timeout,
        }
    }

    /// Uses the host's resolver configuration, or hickory's defaults when it
    /// cannot be read.
    pub fn from_system_conf(timeout: Duration) -> Self {
        let (config, opts) = read_system_conf().unwrap_or_else(|e| {
            tracing::warn!("Failed to read system DNS configuration, using defaults: {}", e);
            (ResolverConfig::default(), ResolverOpts::default())
        });
        Self::new(config, opts, timeout)
    }
}

impl ReverseDns for HickoryReverseDns {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<String, AppError> {
        let millis = self.timeout.as_millis() as u64;
        let response = tokio::time::timeout(self.timeout, self.resolver.reverse_lookup(ip))
            .await
            .map_err(|_| AppError::Timeout(millis))?
            .map_err(|e| match e.kind() {
                ResolveErrorKind::Timeout => AppError::Timeout(millis),
                _ => AppError::Resolve(e),
            })?;

        response
            .iter()
            .next()
            .map(|name| name.to_utf8().trim_end_matches('.').to_string())
            .filter(|name| !name.is_empty())
            .ok_or(AppError::NoHostname(ip))
    }
}
