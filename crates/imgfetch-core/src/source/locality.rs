//! Local/remote classification of normalized sources.

use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

/// Classification of a normalized source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceClass {
    /// Not a downloadable URL (path, data URL, private host, ...).
    Local,
    /// A public (or explicitly allowed local-network) http(s) URL.
    Remote(Url),
}

/// Classify a normalized source.
///
/// A source is remote when it is an `http`/`https` URL with a host that is a
/// public IP address or a domain ending in an alphabetic top-level label.
/// Loopback, private and link-local addresses, `localhost` and single-label
/// hosts are only remote when `allow_local_network` is set.
pub fn classify(normalized: &str, allow_local_network: bool) -> SourceClass {
    let Ok(url) = Url::parse(normalized) else {
        return SourceClass::Local;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return SourceClass::Local;
    }

    let acceptable = match url.host() {
        Some(Host::Ipv4(ip)) => allow_local_network || !is_local_ipv4(ip),
        Some(Host::Ipv6(ip)) => allow_local_network || !is_local_ipv6(ip),
        Some(Host::Domain(domain)) => is_acceptable_domain(domain, allow_local_network),
        None => false,
    };

    if acceptable {
        SourceClass::Remote(url)
    } else {
        SourceClass::Local
    }
}

fn is_local_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
}

fn is_local_ipv6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}

fn is_acceptable_domain(domain: &str, allow_local_network: bool) -> bool {
    let domain = domain.trim_end_matches('.');
    if domain.is_empty() {
        return false;
    }

    if domain == "localhost" || domain.ends_with(".localhost") {
        return allow_local_network;
    }

    match domain.rsplit_once('.') {
        Some((_, tld)) => {
            let valid_tld = tld.starts_with("xn--")
                || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
            valid_tld || allow_local_network
        }
        // Single-label hosts only resolve on a local network
        None => allow_local_network,
    }
}
