//! Network-origin check guarding the internal statistics endpoint.

use std::net::IpAddr;
use std::str::FromStr;

use sqlx::types::ipnetwork::IpNetwork;

/// A configured CIDR range, or nothing.
///
/// With no range configured every origin is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrustedSubnet(Option<IpNetwork>);

impl TrustedSubnet {
    /// Parses a CIDR such as `192.168.1.0/24`. Blank input yields an empty subnet.
    ///
    /// # Errors
    ///
    /// Returns the parser error for anything that is neither blank nor a CIDR.
    pub fn parse(cidr: &str) -> Result<Self, <IpNetwork as FromStr>::Err> {
        let cidr = cidr.trim();
        if cidr.is_empty() {
            return Ok(Self(None));
        }

        IpNetwork::from_str(cidr).map(|net| Self(Some(net)))
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Returns true if `origin` is an IP address inside the configured range.
    pub fn allows(&self, origin: &str) -> bool {
        let Some(network) = self.0 else {
            return false;
        };

        origin
            .trim()
            .parse::<IpAddr>()
            .is_ok_and(|ip| network.contains(ip))
    }
}
