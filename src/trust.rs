//! Actor and network trust evaluation.
//!
//! Pure predicates used by the classifier to decide whether an event's user
//! or source address is untrusted. The two malformed-input policies differ
//! deliberately: a malformed configured range is skipped, while a malformed
//! event address is fail-closed (treated as suspicious).

use std::net::IpAddr;

use tracing::warn;

/// Sentinel user identifier that is always considered suspicious.
const UNKNOWN_USER: &str = "unknown";

/// Returns `true` if the user identifier is untrusted.
///
/// The literal `unknown` (trimmed, case-insensitive) is always suspicious.
/// Otherwise a non-empty allowlist makes any non-member suspicious; an
/// empty allowlist disables the check entirely.
pub fn is_suspicious_user(user: &str, allowlist_users: &[String]) -> bool {
    if user.trim().eq_ignore_ascii_case(UNKNOWN_USER) {
        return true;
    }
    !allowlist_users.is_empty() && !allowlist_users.iter().any(|u| u == user)
}

/// Returns `true` if the source address is untrusted.
///
/// An empty range list disables the check. An address that parses is
/// trusted when it falls inside any parseable configured range.
pub fn is_suspicious_ip(ip: &str, allowlist_ranges: &[String]) -> bool {
    if allowlist_ranges.is_empty() {
        return false;
    }
    let Ok(addr) = ip.parse::<IpAddr>() else {
        // Fail closed: an address we cannot parse cannot be trusted.
        return true;
    };
    for cidr in allowlist_ranges {
        match cidr_contains(cidr, addr) {
            Some(true) => return false,
            Some(false) => {}
            None => warn!("skipping malformed CIDR range '{cidr}' in allowlist"),
        }
    }
    true
}

/// Check whether an address falls inside a CIDR range.
///
/// Returns `None` for a malformed range so the caller can skip it. A bare
/// address without a prefix is treated as a full-length prefix. Mixed
/// address families never match.
fn cidr_contains(cidr: &str, addr: IpAddr) -> Option<bool> {
    let Some((net_str, prefix_str)) = cidr.split_once('/') else {
        return cidr.parse::<IpAddr>().ok().map(|net| net == addr);
    };
    let prefix_len: u8 = prefix_str.parse().ok()?;
    let net: IpAddr = net_str.parse().ok()?;

    match (net, addr) {
        (IpAddr::V4(net), IpAddr::V4(addr)) => {
            if prefix_len > 32 {
                return None;
            }
            let mask = if prefix_len == 0 {
                0
            } else {
                u32::MAX << (32 - prefix_len)
            };
            Some((u32::from(net) & mask) == (u32::from(addr) & mask))
        }
        (IpAddr::V6(net), IpAddr::V6(addr)) => {
            if prefix_len > 128 {
                return None;
            }
            let mask = if prefix_len == 0 {
                0
            } else {
                u128::MAX << (128 - prefix_len)
            };
            Some((u128::from(net) & mask) == (u128::from(addr) & mask))
        }
        _ => Some(false),
    }
}
