//! Voter identity.
//!
//! A voter token is a best-effort, unauthenticated identity taken from the
//! headers set by the reverse proxy in front of the server. Clients behind
//! the same NAT share a token and therefore share one vote per poll.

use http::header::{HeaderMap, HeaderName, InvalidHeaderName};

/// Token used when no proxy header identifies the client.
pub const UNKNOWN_VOTER: &str = "unknown";

/// Header a trusted proxy sets to the connecting client's address.
pub const DEFAULT_CLIENT_IP_HEADER: &str = "x-real-ip";

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Resolves a voter token from request metadata.
///
/// Implementations must be deterministic and free of side effects.
pub trait VoterIdentifier: Send + Sync {
    fn identify(&self, headers: &HeaderMap) -> String;
}

/// Uses the proxy client-IP header, then the first `x-forwarded-for` entry,
/// then [`UNKNOWN_VOTER`].
#[derive(Debug, Clone)]
pub struct ProxyHeaderIdentifier {
    client_ip_header: HeaderName,
}

impl ProxyHeaderIdentifier {
    pub fn new(client_ip_header: &str) -> Result<Self, InvalidHeaderName> {
        let client_ip_header = HeaderName::from_bytes(client_ip_header.trim().as_bytes())?;
        Ok(Self { client_ip_header })
    }

    pub fn client_ip_header(&self) -> &HeaderName {
        &self.client_ip_header
    }
}

impl Default for ProxyHeaderIdentifier {
    fn default() -> Self {
        Self {
            client_ip_header: HeaderName::from_static(DEFAULT_CLIENT_IP_HEADER),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

impl VoterIdentifier for ProxyHeaderIdentifier {
    fn identify(&self, headers: &HeaderMap) -> String {
        header_str(headers, &self.client_ip_header)
            .and_then(non_blank)
            .or_else(|| {
                header_str(headers, &HeaderName::from_static(FORWARDED_FOR_HEADER))
                    .and_then(|raw| raw.split(',').find_map(non_blank))
            })
            .unwrap_or(UNKNOWN_VOTER)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for &(name, value) in pairs {
            map.append(name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn prefers_client_ip_header() {
        let id = ProxyHeaderIdentifier::default();
        let h = headers(&[
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
            ("x-real-ip", "203.0.113.7"),
        ]);
        assert_eq!(id.identify(&h), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_first_forwarded_for_entry() {
        let id = ProxyHeaderIdentifier::default();
        let h = headers(&[("x-forwarded-for", " 198.51.100.4 , 10.0.0.2")]);
        assert_eq!(id.identify(&h), "198.51.100.4");
    }

    #[test]
    fn blank_client_ip_header_is_ignored() {
        let id = ProxyHeaderIdentifier::default();
        let h = headers(&[("x-real-ip", "  "), ("x-forwarded-for", "198.51.100.4")]);
        assert_eq!(id.identify(&h), "198.51.100.4");
    }

    #[test]
    fn client_ip_header_is_taken_whole() {
        let id = ProxyHeaderIdentifier::default();
        let h = headers(&[("x-real-ip", " 203.0.113.7, 10.0.0.2 ")]);
        assert_eq!(id.identify(&h), "203.0.113.7, 10.0.0.2");
    }

    #[test]
    fn no_headers_yields_unknown() {
        let id = ProxyHeaderIdentifier::default();
        assert_eq!(id.identify(&HeaderMap::new()), UNKNOWN_VOTER);
    }

    #[test]
    fn custom_client_ip_header() {
        let id = ProxyHeaderIdentifier::new("CF-Connecting-IP").expect("valid header");
        assert_eq!(id.client_ip_header().as_str(), "cf-connecting-ip");
        let h = headers(&[
            ("x-real-ip", "10.0.0.9"),
            ("cf-connecting-ip", "192.0.2.55"),
        ]);
        assert_eq!(id.identify(&h), "192.0.2.55");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        assert!(ProxyHeaderIdentifier::new("bad header").is_err());
    }

    #[test]
    fn identify_is_deterministic() {
        let id = ProxyHeaderIdentifier::default();
        let h = headers(&[("x-forwarded-for", "198.51.100.4")]);
        assert_eq!(id.identify(&h), id.identify(&h));
    }
}
