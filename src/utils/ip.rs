//! Client IP handling
//!
//! Forwarding headers are only believed when the connection comes from a
//! trusted proxy. With no proxy list configured, a private or loopback
//! peer is assumed to be a reverse proxy.

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// Addresses a geo service can say nothing useful about
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

/// Parse `ip` or `ip:port`
pub fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| raw.parse::<IpAddr>())
        .ok()
}

/// Whether a client address is worth a geo lookup
pub fn is_public_ip(raw: &str) -> bool {
    parse_ip(raw).is_some_and(|ip| !is_private_or_local(&ip))
}

/// `trusted_proxies` entries are single addresses or CIDR blocks
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let Some(addr) = parse_ip(ip) else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        let proxy = proxy.trim();
        if proxy.contains('/') {
            ip_in_cidr(&addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == addr)
        }
    })
}

pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };
    let Ok(prefix_len) = prefix_len.parse::<u32>() else {
        return false;
    };
    let Ok(network) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix_len <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix_len).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix_len <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix_len).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false,
    }
}

/// Pick the client address given the peer and a lazily read forwarded one.
pub fn resolve_client_ip<F>(
    peer: Option<&str>,
    trusted_proxies: &[String],
    forwarded: F,
) -> Option<String>
where
    F: FnOnce() -> Option<String>,
{
    let peer = peer?;

    if !trusted_proxies.is_empty() {
        if is_trusted_proxy(peer, trusted_proxies) {
            let real = forwarded().unwrap_or_else(|| peer.to_string());
            debug!("Trusted proxy {} -> {}", peer, real);
            return Some(real);
        }
        return Some(peer.to_string());
    }

    if parse_ip(peer).is_some_and(|ip| is_private_or_local(&ip))
        && let Some(real) = forwarded()
    {
        debug!("Private peer {}, using forwarded address {}", peer, real);
        return Some(real);
    }

    Some(peer.to_string())
}

pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Option<String> {
    let peer = req.peer_addr().map(|a| a.ip().to_string());
    resolve_client_ip(peer.as_deref(), trusted_proxies, || {
        forwarded_ip_from_headers(req.headers())
    })
}

/// First `X-Forwarded-For` hop, else `X-Real-IP`
pub fn forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_private_ranges() {
        assert!(is_private_or_local(&ip("10.0.0.1")));
        assert!(is_private_or_local(&ip("192.168.1.1")));
        assert!(is_private_or_local(&ip("127.0.0.1")));
        assert!(is_private_or_local(&ip("169.254.3.4")));
        assert!(is_private_or_local(&ip("::1")));
        assert!(is_private_or_local(&ip("fd00::1")));
        assert!(is_private_or_local(&ip("fe80::1")));
        assert!(!is_private_or_local(&ip("8.8.8.8")));
        assert!(!is_private_or_local(&ip("2001:4860:4860::8888")));
    }

    #[test]
    fn test_is_public_ip() {
        assert!(is_public_ip("8.8.8.8"));
        assert!(is_public_ip("8.8.8.8:443"));
        assert!(!is_public_ip("192.168.0.2"));
        assert!(!is_public_ip("not an ip"));
        assert!(!is_public_ip(""));
    }

    #[test]
    fn test_cidr() {
        let addr = ip("192.168.1.100");
        assert!(ip_in_cidr(&addr, "192.168.1.0/24"));
        assert!(!ip_in_cidr(&addr, "192.168.2.0/24"));
        assert!(ip_in_cidr(&addr, "0.0.0.0/0"));
        assert!(!ip_in_cidr(&addr, "192.168.1.0/33"));
        assert!(ip_in_cidr(&ip("2001:db8::1"), "2001:db8::/32"));
        assert!(!ip_in_cidr(&ip("2001:db8::1"), "10.0.0.0/8"));
    }

    #[test]
    fn test_trusted_proxy_list() {
        let proxies = vec!["127.0.0.1".to_string(), "10.0.0.0/8".to_string()];
        assert!(is_trusted_proxy("127.0.0.1:8080", &proxies));
        assert!(is_trusted_proxy("10.20.30.40", &proxies));
        assert!(!is_trusted_proxy("8.8.8.8", &proxies));
    }

    #[test]
    fn test_resolve_client_ip() {
        let fwd = || Some("203.0.113.9".to_string());

        // no list, private peer: believe the header
        assert_eq!(
            resolve_client_ip(Some("127.0.0.1"), &[], fwd).as_deref(),
            Some("203.0.113.9")
        );
        // no list, public peer: ignore it
        assert_eq!(
            resolve_client_ip(Some("8.8.4.4"), &[], fwd).as_deref(),
            Some("8.8.4.4")
        );
        // explicit list without the peer: ignore it, even for private peers
        let proxies = vec!["10.0.0.1".to_string()];
        assert_eq!(
            resolve_client_ip(Some("127.0.0.1"), &proxies, fwd).as_deref(),
            Some("127.0.0.1")
        );
        assert_eq!(
            resolve_client_ip(Some("10.0.0.1"), &proxies, fwd).as_deref(),
            Some("203.0.113.9")
        );
        assert_eq!(resolve_client_ip(None, &[], fwd), None);
    }

    #[test]
    fn test_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for".parse().unwrap(),
            "1.2.3.4, 10.0.0.1".parse().unwrap(),
        );
        assert_eq!(forwarded_ip_from_headers(&headers).as_deref(), Some("1.2.3.4"));

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip".parse().unwrap(), "5.6.7.8".parse().unwrap());
        assert_eq!(forwarded_ip_from_headers(&headers).as_deref(), Some("5.6.7.8"));

        assert!(forwarded_ip_from_headers(&HeaderMap::new()).is_none());
    }
}
