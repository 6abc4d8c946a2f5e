//! Scan URL validation.
//!
//! Turns the raw `url` field of a scan request into a parsed `Url`, rejecting
//! empty, unparsable and non-http(s) input before any network activity.
//!
//! Optionally blocks targets that resolve by name or literal address to the
//! local machine or private networks:
//! - Localhost names (`localhost`, `*.localhost`, `localhost.localdomain`)
//! - Loopback, RFC 1918, link-local, unspecified, multicast and reserved IPv4
//! - Loopback, unique-local, link-local, unspecified and multicast IPv6,
//!   including IPv4-mapped forms of the blocked IPv4 ranges
//!
//! The guard only looks at the URL itself. Names that resolve to private
//! addresses through DNS are not caught.

use std::net::{Ipv4Addr, Ipv6Addr};

use log::debug;
use url::{Host, Url};

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::ScanError;

/// Validates the `url` field of a scan request.
///
/// # Errors
///
/// - `InvalidInput` for an empty (or whitespace-only) or over-long string
/// - `MalformedUrl` when the string does not parse as an absolute URL
/// - `UnsupportedScheme` when the scheme is anything but `http` or `https`
///
/// # Examples
///
/// ```
/// use safescan::{validate_scan_url, ScanError};
///
/// assert!(validate_scan_url("https://example.com").is_ok());
/// assert_eq!(validate_scan_url(""), Err(ScanError::InvalidInput));
/// assert_eq!(validate_scan_url("example.com"), Err(ScanError::MalformedUrl));
/// assert_eq!(validate_scan_url("ftp://example.com"), Err(ScanError::UnsupportedScheme));
/// ```
pub fn validate_scan_url(input: &str) -> Result<Url, ScanError> {
    if input.trim().is_empty() {
        return Err(ScanError::InvalidInput);
    }
    if input.len() > MAX_URL_LENGTH {
        debug!(
            "Rejecting URL exceeding maximum length ({} > {})",
            input.len(),
            MAX_URL_LENGTH
        );
        return Err(ScanError::InvalidInput);
    }

    let url = Url::parse(input).map_err(|e| {
        debug!("Rejecting malformed URL {input:?}: {e}");
        ScanError::MalformedUrl
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => {
            debug!("Rejecting unsupported scheme '{scheme}' for URL {input:?}");
            Err(ScanError::UnsupportedScheme)
        }
    }
}

/// Rejects URLs whose host is local or private.
///
/// # Errors
///
/// `BlockedTarget` naming the offending host, or when the URL has no host.
pub fn ensure_public_target(url: &Url) -> Result<(), ScanError> {
    let blocked = match url.host() {
        Some(Host::Domain(domain)) => is_localhost_domain(domain),
        Some(Host::Ipv4(ip)) => is_private_ipv4(ip),
        Some(Host::Ipv6(ip)) => is_private_ipv6(ip),
        None => true,
    };

    if blocked {
        let host = url.host_str().unwrap_or_default().to_string();
        debug!("Blocking scan of private or local target '{host}'");
        return Err(ScanError::BlockedTarget(host));
    }
    Ok(())
}

/// Checks if an IPv4 address is local, private or otherwise not routable on
/// the public internet.
fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        // 0.0.0.0/8 (this network)
        || ip.octets()[0] == 0
        || ip.is_multicast()
        // 240.0.0.0/4 (reserved, includes broadcast)
        || ip.octets()[0] >= 240
}

/// Checks if an IPv6 address is local or private.
fn is_private_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_private_ipv4(mapped);
    }

    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        // fc00::/7 (unique local)
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 (link-local)
        || (first & 0xffc0) == 0xfe80
}

/// Checks if a domain name is a localhost variant.
fn is_localhost_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    domain == "localhost" || domain == "localhost.localdomain" || domain.ends_with(".localhost")
}
