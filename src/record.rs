//! SRV records.

use crate::endpoint::{Endpoint, Protocol};
use std::fmt::Display;

/// Representation of types that contain the fields of a SRV record.
pub trait SrvRecord {
    /// Type representing the SRV record's target. Must implement `Display` so
    /// it can be turned into an [`Endpoint`] host.
    type Target: Display + ?Sized;

    /// Gets a SRV record's target.
    fn target(&self) -> &Self::Target;

    /// Gets a SRV record's port.
    fn port(&self) -> u16;

    /// Gets a SRV record's priority.
    fn priority(&self) -> u16;

    /// Gets a SRV record's weight.
    fn weight(&self) -> u16;

    /// Converts a SRV record into an [`Endpoint`] reachable over `protocol`.
    ///
    /// The trailing `.` of a fully qualified target is dropped, so
    /// `xmpp.example.com.` becomes the host `xmpp.example.com`.
    fn to_endpoint(&self, protocol: Protocol) -> Endpoint {
        let target = self.target().to_string();
        Endpoint::new(protocol, target.trim_end_matches('.'), self.port())
    }
}

/// A SRV record held by value.
///
/// Useful for statically configured services and for resolvers that
/// produce records in some format of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnedSrvRecord {
    /// Host name of the service instance.
    pub target: String,
    /// Port the service instance listens on.
    pub port: u16,
    /// Lower values are preferred.
    pub priority: u16,
    /// Relative selection weight among records of equal priority.
    pub weight: u16,
}

impl OwnedSrvRecord {
    /// Creates a record from its parts.
    pub fn new(target: impl Into<String>, port: u16, priority: u16, weight: u16) -> Self {
        Self {
            target: target.into(),
            port,
            priority,
            weight,
        }
    }
}

impl SrvRecord for OwnedSrvRecord {
    type Target = str;

    fn target(&self) -> &Self::Target {
        &self.target
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn priority(&self) -> u16 {
        self.priority
    }

    fn weight(&self) -> u16 {
        self.weight
    }
}
