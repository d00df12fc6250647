//! Connection endpoints and `domain:service` addresses.

use std::{fmt, str::FromStr};

/// Transport protocol of a SRV-located service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Stream transport.
    Tcp,
    /// Datagram transport.
    Udp,
}

impl Protocol {
    /// Protocol label as used in SRV names and network strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produced when a string names neither `tcp` nor `udp`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown protocol {0:?}, expected \"tcp\" or \"udp\"")]
pub struct ParseProtocolError(String);

impl FromStr for Protocol {
    type Err = ParseProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("tcp") {
            Ok(Protocol::Tcp)
        } else if s.eq_ignore_ascii_case("udp") {
            Ok(Protocol::Udp)
        } else {
            Err(ParseProtocolError(s.to_owned()))
        }
    }
}

/// A single connection candidate derived from a SRV record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    protocol: Protocol,
    host: String,
    port: u16,
}

impl Endpoint {
    /// Creates an endpoint.
    pub fn new(protocol: Protocol, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol,
            host: host.into(),
            port,
        }
    }

    /// Transport protocol to connect with.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Network name of the endpoint, `"tcp"` or `"udp"`.
    pub fn network(&self) -> &'static str {
        self.protocol.as_str()
    }

    /// Host name or IP literal, without trailing dot.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port number.
    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Formats as `host:port`, bracketing IPv6 literals.
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Splits a `domain:service` address into its domain and service parts.
///
/// Returns `None` unless the address contains exactly one `:` with a
/// non-empty part on either side.
pub fn split_address(address: &str) -> Option<(&str, &str)> {
    let mut parts = address.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(domain), Some(service), None) if !domain.is_empty() && !service.is_empty() => {
            Some((domain, service))
        }
        _ => None,
    }
}
