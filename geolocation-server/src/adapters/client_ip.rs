use std::net::IpAddr;

use axum::http::HeaderMap;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

const X_REAL_IP: &str = "x-real-ip";

fn usable_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("unknown"))
}

/// Client address from `X-Forwarded-For`, then `X-Real-IP`, then the peer.
/// Only the first entry of a comma-separated list is kept.
pub fn resolve_client_ip(headers: &HeaderMap, peer: IpAddr) -> String {
    let client_ip = usable_header(headers, X_FORWARDED_FOR)
        .or_else(|| usable_header(headers, X_REAL_IP))
        .map(str::to_owned)
        .unwrap_or_else(|| peer.to_canonical().to_string());

    match client_ip.split_once(',') {
        Some((first, _)) => first.trim().to_string(),
        None => client_ip,
    }
}
